//! GIF header and logical screen descriptor.
//!
//! Every GIF starts with a fixed 13-byte prefix:
//! - 6 bytes: signature `GIF` and version `87a` or `89a`
//! - 7 bytes: logical screen descriptor (width, height, packed, background, aspect)

use gifscope_common::{BinaryReader, FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
use tracing::{debug, warn};
use zerocopy::byteorder::little_endian::U16;

use crate::{Error, Result};

/// Length of the header (signature + version).
pub const HEADER_LEN: usize = 6;

/// Length of the logical screen descriptor.
pub const SCREEN_DESCRIPTOR_LEN: usize = 7;

/// Length of the fixed prefix every GIF must carry.
pub const PREFIX_LEN: usize = HEADER_LEN + SCREEN_DESCRIPTOR_LEN;

/// On-disk layout of the 13-byte prefix.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawPrefix {
    signature: [u8; 3],
    version: [u8; 3],
    width: U16,
    height: U16,
    packed: u8,
    background_color_index: u8,
    pixel_aspect_ratio: u8,
}

/// The GIF signature and version.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GifHeader {
    /// Signature, always `GIF` once parsed.
    pub signature: String,
    /// Version, `87a` or `89a` once parsed.
    pub version: String,
}

impl GifHeader {
    /// The only accepted signature.
    pub const SIGNATURE: &'static str = "GIF";

    /// Accepted versions.
    pub const VERSIONS: [&'static str; 2] = ["87a", "89a"];

    /// Check whether a signature/version pair is supported.
    pub fn is_supported(signature: &str, version: &str) -> bool {
        signature == Self::SIGNATURE && Self::VERSIONS.contains(&version)
    }
}

/// The logical screen descriptor.
///
/// Derived fields are computed from `packed` on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScreenDescriptor {
    /// Logical screen width.
    pub width: u16,
    /// Logical screen height.
    pub height: u16,
    /// Packed fields byte.
    pub packed: u8,
    /// Background color index into the global color table.
    pub background_color_index: u8,
    /// Pixel aspect ratio byte.
    pub pixel_aspect_ratio: u8,
}

impl ScreenDescriptor {
    /// Whether a global color table follows the descriptor (bit 7).
    pub fn global_color_table_flag(&self) -> bool {
        self.packed & 0b1000_0000 != 0
    }

    /// Color resolution in bits per primary color (bits 4-6, plus one).
    pub fn color_resolution(&self) -> u8 {
        ((self.packed & 0b0111_0000) >> 4) + 1
    }

    /// Whether the global color table is sorted (bit 3).
    pub fn sort_flag(&self) -> bool {
        self.packed & 0b0000_1000 != 0
    }

    /// Number of entries in the global color table: 2^(N+1).
    pub fn global_color_table_size(&self) -> usize {
        color_table_size(self.packed)
    }

    /// Length in bytes of the global color table, zero when absent.
    pub fn global_color_table_len(&self) -> usize {
        if self.global_color_table_flag() {
            3 * self.global_color_table_size()
        } else {
            0
        }
    }
}

/// Entry count encoded in the low three bits of a packed byte.
pub(crate) fn color_table_size(packed: u8) -> usize {
    1 << ((packed & 0b0000_0111) + 1)
}

/// Parse the header and logical screen descriptor.
///
/// Fails when the buffer is shorter than 13 bytes or the signature/version
/// is unsupported. No other validation happens here.
pub fn parse(data: &[u8]) -> Result<(GifHeader, ScreenDescriptor)> {
    if data.len() < PREFIX_LEN {
        warn!(len = data.len(), "buffer too small for GIF header");
        return Err(Error::TooSmall(data.len()));
    }

    let mut reader = BinaryReader::new(data);
    let raw: RawPrefix = reader.read_struct()?;

    let signature = String::from_utf8_lossy(&raw.signature).into_owned();
    let version = String::from_utf8_lossy(&raw.version).into_owned();

    if !GifHeader::is_supported(&signature, &version) {
        warn!(%signature, %version, "unsupported GIF signature");
        return Err(Error::UnsupportedSignature { signature, version });
    }

    let screen = ScreenDescriptor {
        width: raw.width.get(),
        height: raw.height.get(),
        packed: raw.packed,
        background_color_index: raw.background_color_index,
        pixel_aspect_ratio: raw.pixel_aspect_ratio,
    };

    debug!(
        %version,
        width = screen.width,
        height = screen.height,
        gct = screen.global_color_table_flag(),
        "parsed GIF header"
    );

    Ok((GifHeader { signature, version }, screen))
}
