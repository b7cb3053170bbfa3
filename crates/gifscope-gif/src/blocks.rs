//! Read-only views of the fields inside scanned blocks.
//!
//! These expose raw values only. Nothing here validates timing, disposal
//! or image geometry.

use gifscope_common::BinaryReader;

use crate::header::color_table_size;
use crate::{BlockKind, ByteRange};

/// Fields of an image descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub packed: u8,
}

impl ImageDescriptor {
    /// Decode from an [`BlockKind::ImageDescriptor`] range.
    pub fn decode(data: &[u8], range: &ByteRange) -> Option<Self> {
        if range.kind != BlockKind::ImageDescriptor || range.length < 10 {
            return None;
        }

        let mut reader = BinaryReader::new_at(data, range.start + 1);
        Some(Self {
            left: reader.read_u16().ok()?,
            top: reader.read_u16().ok()?,
            width: reader.read_u16().ok()?,
            height: reader.read_u16().ok()?,
            packed: reader.read_u8().ok()?,
        })
    }

    pub fn local_color_table_flag(&self) -> bool {
        self.packed & 0b1000_0000 != 0
    }

    pub fn interlace_flag(&self) -> bool {
        self.packed & 0b0100_0000 != 0
    }

    pub fn sort_flag(&self) -> bool {
        self.packed & 0b0010_0000 != 0
    }

    /// Number of entries in the local color table: 2^(N+1).
    pub fn local_color_table_size(&self) -> usize {
        color_table_size(self.packed)
    }
}

/// Fields of a graphic control extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraphicControl {
    pub packed: u8,
    /// Delay in hundredths of a second.
    pub delay: u16,
    pub transparent_index: u8,
}

impl GraphicControl {
    /// Decode from a [`BlockKind::GraphicControlExtension`] range.
    pub fn decode(data: &[u8], range: &ByteRange) -> Option<Self> {
        if range.kind != BlockKind::GraphicControlExtension || range.length < 7 {
            return None;
        }

        let mut reader = BinaryReader::new_at(data, range.start + 3);
        Some(Self {
            packed: reader.read_u8().ok()?,
            delay: reader.read_u16().ok()?,
            transparent_index: reader.read_u8().ok()?,
        })
    }

    /// Disposal method (bits 2-4).
    pub fn disposal_method(&self) -> u8 {
        (self.packed & 0b0001_1100) >> 2
    }

    pub fn user_input_flag(&self) -> bool {
        self.packed & 0b0000_0010 != 0
    }

    pub fn transparency_flag(&self) -> bool {
        self.packed & 0b0000_0001 != 0
    }
}

/// Identifier and authentication code of an application extension.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ApplicationExtension {
    /// Eight-character application identifier, e.g. `NETSCAPE`.
    pub identifier: String,
    /// Three-byte authentication code, e.g. `2.0`.
    pub auth_code: String,
}

impl ApplicationExtension {
    /// Decode from a [`BlockKind::ApplicationExtension`] range.
    pub fn decode(data: &[u8], range: &ByteRange) -> Option<Self> {
        if range.kind != BlockKind::ApplicationExtension || range.length < 14 {
            return None;
        }

        let mut reader = BinaryReader::new_at(data, range.start + 3);
        let identifier = reader.read_bytes(8).ok()?;
        let auth_code = reader.read_bytes(3).ok()?;
        Some(Self {
            identifier: String::from_utf8_lossy(identifier).into_owned(),
            auth_code: String::from_utf8_lossy(auth_code).into_owned(),
        })
    }
}
