//! Offset to human-readable description.
//!
//! Descriptions are recomputed from the buffer on every call: the fixed
//! prefix is answered directly, everything past it re-runs the scanner to
//! find the owning block. Lookups never fail; offsets outside the buffer
//! and bytes no block claims get a fallback text.

use crate::header::PREFIX_LEN;
use crate::{build_ranges, BlockKind, ByteRange, ScreenDescriptor};

/// Text returned for offsets outside the buffer.
pub const OUT_OF_BOUNDS: &str = "Out of file bounds";

/// Text returned for in-bounds bytes that no block claims.
pub const UNKNOWN_REGION: &str = "Data: (unknown region)";

/// Describe the byte at `offset`.
pub fn describe(data: &[u8], screen: &ScreenDescriptor, offset: i64) -> String {
    let offset = match usize::try_from(offset) {
        Ok(offset) if offset < data.len() => offset,
        _ => return OUT_OF_BOUNDS.to_string(),
    };

    if offset < PREFIX_LEN {
        return describe_prefix(offset).to_string();
    }

    let ranges = build_ranges(data, screen);
    let Some(block) = ranges.iter().find(|r| r.contains(offset)) else {
        return UNKNOWN_REGION.to_string();
    };

    match block.kind {
        BlockKind::GlobalColorTable => describe_color_table("GCT", block, offset),
        BlockKind::LocalColorTable => describe_color_table("LCT", block, offset),
        BlockKind::ImageDescriptor => describe_image_descriptor(block, offset).to_string(),
        BlockKind::ImageData => describe_image_data(block, offset).to_string(),
        BlockKind::GraphicControlExtension => describe_graphic_control(block, offset).to_string(),
        BlockKind::ApplicationExtension => describe_application(block, offset).to_string(),
        BlockKind::Trailer => "Trailer (0x3B): End of GIF".to_string(),
        BlockKind::Header | BlockKind::LogicalScreenDescriptor | BlockKind::Unknown => {
            format!("Block: {}", block.name)
        }
    }
}

fn describe_prefix(offset: usize) -> &'static str {
    match offset {
        0 => "Header: Signature 'G'",
        1 => "Header: Signature 'I'",
        2 => "Header: Signature 'F'",
        3 => "Header: Version char #1 ('8')",
        4 => "Header: Version char #2 ('7' or '9')",
        5 => "Header: Version char #3 ('a')",
        6 | 7 => "LSD: Width (UInt16 LE)",
        8 | 9 => "LSD: Height (UInt16 LE)",
        10 => "LSD: Packed fields (GCT flag, color resolution, sort, GCT size)",
        11 => "LSD: Background Color Index",
        _ => "LSD: Pixel Aspect Ratio",
    }
}

fn describe_color_table(table: &str, range: &ByteRange, offset: usize) -> String {
    let rel = range.relative(offset);
    let channel = match rel % 3 {
        0 => "R",
        1 => "G",
        _ => "B",
    };
    format!("{}: Color #{} channel {} (RGB)", table, rel / 3, channel)
}

fn describe_image_descriptor(range: &ByteRange, offset: usize) -> &'static str {
    match range.relative(offset) {
        0 => "Image Descriptor: Separator (0x2C)",
        1 | 2 => "Image Descriptor: Left Position (UInt16 LE)",
        3 | 4 => "Image Descriptor: Top Position (UInt16 LE)",
        5 | 6 => "Image Descriptor: Width (UInt16 LE)",
        7 | 8 => "Image Descriptor: Height (UInt16 LE)",
        9 => "Image Descriptor: Packed (LCT flag, interlace, sort, LCT size)",
        _ => "Image Descriptor",
    }
}

fn describe_image_data(range: &ByteRange, offset: usize) -> &'static str {
    match range.relative(offset) {
        0 => "Image Data: LZW Minimum Code Size",
        _ => "Image Data: Compressed sub-block bytes",
    }
}

fn describe_graphic_control(range: &ByteRange, offset: usize) -> &'static str {
    match range.relative(offset) {
        0 => "GCE: Extension Introducer (0x21)",
        1 => "GCE: Graphic Control Label (0xF9)",
        2 => "GCE: Block Size (usually 0x04)",
        3 => "GCE: Packed (disposal method, user input flag, transparency flag)",
        4 | 5 => "GCE: Delay Time (UInt16 LE, in 1/100s)",
        6 => "GCE: Transparent Color Index",
        _ => "GCE: Block Terminator (0x00)",
    }
}

fn describe_application(range: &ByteRange, offset: usize) -> &'static str {
    match range.relative(offset) {
        0 => "AppExt: Extension Introducer (0x21)",
        1 => "AppExt: Application Extension Label (0xFF)",
        2 => "AppExt: Block Size (usually 0x0B)",
        3..=13 => "AppExt: Application Identifier + Auth Code (11 bytes)",
        _ => "AppExt: Application Data sub-block bytes",
    }
}

/// Everything a byte inspector shows for one offset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ByteInfo {
    pub offset: usize,
    pub offset_hex: String,
    pub value: u8,
    pub value_hex: String,
    /// The byte as a printable ASCII character, or `.`.
    pub ascii: char,
    pub description: String,
}

/// Inspect the byte at `offset`, or `None` when it lies outside the buffer.
pub fn inspect(data: &[u8], screen: &ScreenDescriptor, offset: usize) -> Option<ByteInfo> {
    let value = *data.get(offset)?;
    Some(ByteInfo {
        offset,
        offset_hex: format!("{:08X}", offset),
        value,
        value_hex: format!("{:02X}", value),
        ascii: printable(value),
        description: describe(data, screen, offset as i64),
    })
}

/// Map a byte to its printable ASCII character, or `.`.
pub(crate) fn printable(byte: u8) -> char {
    if (0x20..=0x7E).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
