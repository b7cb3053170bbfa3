//! Tagged byte ranges produced by the structure scanner.

use std::fmt;

/// Qualifier appended to the name of a range clipped to the buffer end.
pub const TRUNCATED_SUFFIX: &str = " (truncated)";

/// The kind of block a byte range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlockKind {
    Header,
    LogicalScreenDescriptor,
    GlobalColorTable,
    GraphicControlExtension,
    ApplicationExtension,
    ImageDescriptor,
    LocalColorTable,
    ImageData,
    Trailer,
    /// Unrecognised extensions, stray bytes and truncated extensions.
    Unknown,
}

impl BlockKind {
    /// Whether this kind is a color table.
    pub const fn is_color_table(&self) -> bool {
        matches!(self, Self::GlobalColorTable | Self::LocalColorTable)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::LogicalScreenDescriptor => "LogicalScreenDescriptor",
            Self::GlobalColorTable => "GlobalColorTable",
            Self::GraphicControlExtension => "GraphicControlExtension",
            Self::ApplicationExtension => "ApplicationExtension",
            Self::ImageDescriptor => "ImageDescriptor",
            Self::LocalColorTable => "LocalColorTable",
            Self::ImageData => "ImageData",
            Self::Trailer => "Trailer",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A half-open interval `[start, start + length)` over the file buffer.
///
/// Ranges are plain values: the scanner creates them and nothing mutates
/// them afterwards, so the same range can sit in the flat list and the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ByteRange {
    pub kind: BlockKind,
    pub name: String,
    pub start: usize,
    pub length: usize,
}

impl ByteRange {
    /// Create a new range.
    pub fn new(kind: BlockKind, name: impl Into<String>, start: usize, length: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            start,
            length,
        }
    }

    /// Create a range whose name carries the truncation qualifier.
    pub fn truncated(kind: BlockKind, name: impl Into<String>, start: usize, length: usize) -> Self {
        let mut name = name.into();
        name.push_str(TRUNCATED_SUFFIX);
        Self::new(kind, name, start, length)
    }

    /// First offset past the range.
    #[inline]
    pub const fn end_exclusive(&self) -> usize {
        self.start + self.length
    }

    /// Last offset inside the range. Equals `start` for an empty range.
    #[inline]
    pub const fn end_inclusive(&self) -> usize {
        if self.length == 0 {
            self.start
        } else {
            self.start + self.length - 1
        }
    }

    /// Check whether an offset falls inside the range.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end_exclusive()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether the scanner clipped this range to the end of the buffer.
    pub fn is_truncated(&self) -> bool {
        self.name.ends_with(TRUNCATED_SUFFIX)
    }

    /// Offset of `offset` relative to the start of the range.
    #[inline]
    pub(crate) const fn relative(&self, offset: usize) -> usize {
        offset - self.start
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:08X}..{:08X}] ({} bytes)",
            self.name,
            self.start,
            self.end_inclusive(),
            self.length
        )
    }
}
