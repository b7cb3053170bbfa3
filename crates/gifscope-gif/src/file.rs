//! GIF file handling.

use std::fs;
use std::path::{Path, PathBuf};

use crate::describe::{describe, inspect, ByteInfo};
use crate::header::{self, GifHeader, ScreenDescriptor};
use crate::{build_ranges, build_tree, ByteRange, Result, StructureNode};

/// A loaded GIF: its path and the parsed fixed prefix.
///
/// The file bytes are not stored here. Every structural query takes the
/// current buffer, so results always reflect the latest edits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GifFile {
    path: PathBuf,
    header: GifHeader,
    screen: ScreenDescriptor,
}

impl GifFile {
    /// Parse the header of an in-memory buffer.
    ///
    /// The path is only carried along for display.
    pub fn parse(path: impl Into<PathBuf>, data: &[u8]) -> Result<Self> {
        let (header, screen) = header::parse(data)?;
        Ok(Self {
            path: path.into(),
            header,
            screen,
        })
    }

    /// Read a GIF from disk and parse its header.
    ///
    /// Returns the parsed file together with its bytes.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<u8>)> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let file = Self::parse(path, &data)?;
        Ok((file, data))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &GifHeader {
        &self.header
    }

    pub fn screen(&self) -> &ScreenDescriptor {
        &self.screen
    }

    /// Flat, ordered block ranges of `data`.
    pub fn ranges(&self, data: &[u8]) -> Vec<ByteRange> {
        build_ranges(data, &self.screen)
    }

    /// Structure tree of `data`.
    pub fn tree(&self, data: &[u8]) -> StructureNode {
        build_tree(&self.ranges(data))
    }

    /// Describe the byte at `offset` of `data`.
    pub fn describe(&self, data: &[u8], offset: i64) -> String {
        describe(data, &self.screen, offset)
    }

    /// Inspect the byte at `offset` of `data`.
    pub fn inspect(&self, data: &[u8], offset: usize) -> Option<ByteInfo> {
        inspect(data, &self.screen, offset)
    }

    /// One-line summary of the header and screen descriptor.
    pub fn status_line(&self) -> String {
        let s = &self.screen;
        let has_gct = s.global_color_table_flag();
        format!(
            "{}{} | {}x{} | GCT={} | GCT Size={}",
            self.header.signature,
            self.header.version,
            s.width,
            s.height,
            if has_gct { "Yes" } else { "No" },
            if has_gct { s.global_color_table_size() } else { 0 }
        )
    }
}
