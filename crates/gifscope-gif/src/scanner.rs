//! Structure scanner.
//!
//! Walks the buffer after the 13-byte prefix in a single forward pass and
//! classifies every block it meets. Malformed input never fails the scan:
//! blocks that overrun the buffer are clipped and tagged as truncated, and
//! bytes that start no known block are emitted one at a time as unknown.

use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::header::{color_table_size, HEADER_LEN, PREFIX_LEN, SCREEN_DESCRIPTOR_LEN};
use crate::{BlockKind, ByteRange, ScreenDescriptor};

/// Trailer byte marking the end of the data stream.
pub const TRAILER: u8 = 0x3B;

/// Extension introducer.
pub const EXTENSION_INTRODUCER: u8 = 0x21;

/// Image descriptor separator.
pub const IMAGE_SEPARATOR: u8 = 0x2C;

/// Graphic control extension label.
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;

/// Application extension label.
pub const APPLICATION_LABEL: u8 = 0xFF;

/// Total length of a graphic control extension: 21 F9 04 [4 bytes] 00.
pub const GRAPHIC_CONTROL_LEN: usize = 8;

/// Length of an image descriptor including the separator.
pub const IMAGE_DESCRIPTOR_LEN: usize = 10;

/// Result of measuring a sub-block chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubBlockChain {
    /// Bytes consumed, including the zero terminator when one was found.
    pub len: usize,
    /// Whether a zero-size terminator ended the chain.
    pub terminated: bool,
}

/// Measure a chain of `(size, data[size])` sub-blocks starting at `start`.
///
/// A chain whose last block overruns the buffer stops at the buffer end
/// without a terminator.
pub fn sub_block_chain(data: &[u8], start: usize) -> SubBlockChain {
    let mut pos = start;

    while let Some(&size) = data.get(pos) {
        pos += 1;

        if size == 0 {
            return SubBlockChain {
                len: pos - start,
                terminated: true,
            };
        }

        pos += size as usize;
    }

    SubBlockChain {
        len: pos.min(data.len()).saturating_sub(start),
        terminated: false,
    }
}

/// Build the ordered list of byte ranges for a buffer.
///
/// The header and screen descriptor ranges are always emitted. Everything
/// after them is discovered by walking the buffer; each loop iteration
/// advances by at least one byte, so the scan is bounded by the buffer length.
pub fn build_ranges(data: &[u8], screen: &ScreenDescriptor) -> Vec<ByteRange> {
    let mut scanner = Scanner::new(data);
    scanner.run(screen);
    scanner.ranges
}

struct Scanner<'a> {
    data: &'a [u8],
    cursor: usize,
    ranges: Vec<ByteRange>,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: PREFIX_LEN,
            ranges: Vec::new(),
        }
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.cursor)
    }

    fn push(&mut self, range: ByteRange) {
        if range.is_truncated() {
            warn!(start = range.start, length = range.length, name = %range.name, "block clipped to buffer end");
        } else {
            debug!(start = range.start, length = range.length, name = %range.name, "block");
        }
        self.ranges.push(range);
    }

    fn run(&mut self, screen: &ScreenDescriptor) {
        self.push(ByteRange::new(
            BlockKind::Header,
            "Header (Signature+Version)",
            0,
            HEADER_LEN,
        ));
        self.push(ByteRange::new(
            BlockKind::LogicalScreenDescriptor,
            "Logical Screen Descriptor (LSD)",
            HEADER_LEN,
            SCREEN_DESCRIPTOR_LEN,
        ));

        if screen.global_color_table_flag() {
            let size = screen.global_color_table_size();
            let name = format!("Global Color Table (GCT) x{}", size);
            if self.table(BlockKind::GlobalColorTable, name, 3 * size).is_break() {
                return;
            }
        }

        while let Some(&byte) = self.data.get(self.cursor) {
            let step = match byte {
                TRAILER => {
                    self.push(ByteRange::new(BlockKind::Trailer, "Trailer (0x3B)", self.cursor, 1));
                    ControlFlow::Break(())
                }
                EXTENSION_INTRODUCER => self.extension(),
                IMAGE_SEPARATOR => self.image(),
                _ => {
                    warn!(offset = self.cursor, byte, "unknown byte in block stream");
                    self.push(ByteRange::new(
                        BlockKind::Unknown,
                        format!("Unknown byte 0x{:02X}", byte),
                        self.cursor,
                        1,
                    ));
                    self.cursor += 1;
                    ControlFlow::Continue(())
                }
            };

            if step.is_break() {
                break;
            }
        }

        debug!(blocks = self.ranges.len(), "scan finished");
    }

    /// Emit a color table of `len` bytes at the cursor, clipping and
    /// stopping when it does not fit.
    fn table(&mut self, kind: BlockKind, name: String, len: usize) -> ControlFlow<()> {
        if len > self.remaining() {
            self.push(ByteRange::truncated(kind, name, self.cursor, self.remaining()));
            self.cursor = self.data.len();
            return ControlFlow::Break(());
        }

        self.push(ByteRange::new(kind, name, self.cursor, len));
        self.cursor += len;
        ControlFlow::Continue(())
    }

    fn extension(&mut self) -> ControlFlow<()> {
        let start = self.cursor;
        let Some(&label) = self.data.get(start + 1) else {
            self.push(ByteRange::new(
                BlockKind::Unknown,
                "Extension (truncated)",
                start,
                self.remaining(),
            ));
            return ControlFlow::Break(());
        };

        let (kind, name, (len, truncated)) = match label {
            GRAPHIC_CONTROL_LABEL => (
                BlockKind::GraphicControlExtension,
                "Graphic Control Extension (GCE)".to_string(),
                self.fixed_len(GRAPHIC_CONTROL_LEN),
            ),
            APPLICATION_LABEL => (
                BlockKind::ApplicationExtension,
                "Application Extension (AppExt)".to_string(),
                self.block_prefixed_len(),
            ),
            // Unknown labels are assumed to share the application extension shape.
            _ => (
                BlockKind::Unknown,
                format!("Extension (0x21 0x{:02X})", label),
                self.block_prefixed_len(),
            ),
        };

        let range = if truncated {
            ByteRange::truncated(kind, name, start, len)
        } else {
            ByteRange::new(kind, name, start, len)
        };
        self.push(range);
        self.cursor += len;
        ControlFlow::Continue(())
    }

    fn image(&mut self) -> ControlFlow<()> {
        let start = self.cursor;
        if self.remaining() < IMAGE_DESCRIPTOR_LEN {
            self.push(ByteRange::truncated(
                BlockKind::ImageDescriptor,
                "Image Descriptor",
                start,
                self.remaining(),
            ));
            return ControlFlow::Break(());
        }

        self.push(ByteRange::new(
            BlockKind::ImageDescriptor,
            "Image Descriptor",
            start,
            IMAGE_DESCRIPTOR_LEN,
        ));

        let packed = self.data[start + IMAGE_DESCRIPTOR_LEN - 1];
        self.cursor += IMAGE_DESCRIPTOR_LEN;

        if packed & 0b1000_0000 != 0 {
            let size = color_table_size(packed);
            let name = format!("Local Color Table (LCT) x{}", size);
            self.table(BlockKind::LocalColorTable, name, 3 * size)?;
        }

        // LZW minimum code size followed by the data sub-blocks.
        let start = self.cursor;
        let range = if start >= self.data.len() {
            ByteRange::truncated(BlockKind::ImageData, "Image Data (LZW sub-blocks)", start, 0)
        } else {
            let chain = sub_block_chain(self.data, start + 1);
            let len = 1 + chain.len;
            if chain.terminated {
                ByteRange::new(BlockKind::ImageData, "Image Data (LZW sub-blocks)", start, len)
            } else {
                ByteRange::truncated(BlockKind::ImageData, "Image Data (LZW sub-blocks)", start, len)
            }
        };
        self.cursor += range.length;
        self.push(range);
        ControlFlow::Continue(())
    }

    /// Length of a fixed-size block, clipped to the buffer.
    fn fixed_len(&self, len: usize) -> (usize, bool) {
        if len > self.remaining() {
            (self.remaining(), true)
        } else {
            (len, false)
        }
    }

    /// Length of `introducer, label, block_size, data[block_size], sub-blocks...`.
    fn block_prefixed_len(&self) -> (usize, bool) {
        let start = self.cursor;
        let Some(&block_size) = self.data.get(start + 2) else {
            return (self.remaining(), true);
        };

        let pos = start + 3 + block_size as usize;
        if pos > self.data.len() {
            return (self.remaining(), true);
        }

        let chain = sub_block_chain(self.data, pos);
        (pos - start + chain.len, !chain.terminated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header;

    fn gif(packed: u8, body: &[u8]) -> Vec<u8> {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, packed, 0x00, 0x00]);
        data.extend_from_slice(body);
        data
    }

    fn scan(data: &[u8]) -> Vec<ByteRange> {
        let (_, screen) = header::parse(data).unwrap();
        build_ranges(data, &screen)
    }

    fn kinds(ranges: &[ByteRange]) -> Vec<BlockKind> {
        ranges.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_sub_block_chain_terminated() {
        let data = [0x02, 0xAA, 0xBB, 0x01, 0xCC, 0x00, 0x3B];
        let chain = sub_block_chain(&data, 0);
        assert_eq!(chain, SubBlockChain { len: 6, terminated: true });
    }

    #[test]
    fn test_sub_block_chain_overrun() {
        let data = [0x01, 0xAA, 0x10, 0xBB];
        let chain = sub_block_chain(&data, 0);
        assert_eq!(chain, SubBlockChain { len: 4, terminated: false });
    }

    #[test]
    fn test_sub_block_chain_at_end() {
        let data = [0x01, 0xAA];
        assert_eq!(sub_block_chain(&data, 2).len, 0);
        assert_eq!(sub_block_chain(&data, 5).len, 0);
    }

    #[test]
    fn test_graphic_control_extension() {
        let data = gif(0x00, &[0x21, 0xF9, 0x04, 0x04, 0x0A, 0x00, 0x01, 0x00, 0x3B]);
        let ranges = scan(&data);

        assert_eq!(
            kinds(&ranges),
            vec![
                BlockKind::Header,
                BlockKind::LogicalScreenDescriptor,
                BlockKind::GraphicControlExtension,
                BlockKind::Trailer
            ]
        );
        assert_eq!(ranges[2].start, 13);
        assert_eq!(ranges[2].length, 8);
        assert_eq!(ranges[3].start, 21);
    }

    #[test]
    fn test_application_extension() {
        let mut body = vec![0x21, 0xFF, 0x0B];
        body.extend_from_slice(b"NETSCAPE2.0");
        body.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00, 0x3B]);
        let data = gif(0x00, &body);
        let ranges = scan(&data);

        assert_eq!(ranges[2].kind, BlockKind::ApplicationExtension);
        assert_eq!(ranges[2].name, "Application Extension (AppExt)");
        assert_eq!(ranges[2].length, 3 + 11 + 5);
        assert_eq!(ranges[3].kind, BlockKind::Trailer);
    }

    #[test]
    fn test_unknown_extension_continues() {
        // Comment extension: no block-size prefix in the real format, so the
        // first sub-block size is read as the block size.
        let body = [0x21, 0xFE, 0x02, b'h', b'i', 0x00, 0x3B];
        let data = gif(0x00, &body);
        let ranges = scan(&data);

        assert_eq!(ranges[2].kind, BlockKind::Unknown);
        assert_eq!(ranges[2].name, "Extension (0x21 0xFE)");
        assert_eq!(ranges[2].length, 6);
        assert_eq!(ranges[3].kind, BlockKind::Trailer);
    }

    #[test]
    fn test_truncated_extension_introducer() {
        let data = gif(0x00, &[0x21]);
        let ranges = scan(&data);

        let last = ranges.last().unwrap();
        assert_eq!(last.kind, BlockKind::Unknown);
        assert_eq!(last.name, "Extension (truncated)");
        assert_eq!((last.start, last.length), (13, 1));
    }

    #[test]
    fn test_truncated_graphic_control() {
        let data = gif(0x00, &[0x21, 0xF9, 0x04, 0x00]);
        let ranges = scan(&data);

        let last = ranges.last().unwrap();
        assert_eq!(last.kind, BlockKind::GraphicControlExtension);
        assert!(last.is_truncated());
        assert_eq!(last.length, 4);
    }

    #[test]
    fn test_unknown_bytes_advance_one_at_a_time() {
        let data = gif(0x00, &[0x00, 0x99, 0x3B]);
        let ranges = scan(&data);

        assert_eq!(ranges[2].name, "Unknown byte 0x00");
        assert_eq!(ranges[3].name, "Unknown byte 0x99");
        assert_eq!(ranges[3].start, 14);
        assert_eq!(ranges[4].kind, BlockKind::Trailer);
    }

    #[test]
    fn test_trailer_stops_scan() {
        let data = gif(0x00, &[0x3B, 0x2C, 0x00]);
        let ranges = scan(&data);

        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2].kind, BlockKind::Trailer);
    }

    #[test]
    fn test_truncated_global_color_table() {
        let data = gif(0x81, &[0x00; 5]);
        let ranges = scan(&data);

        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2].name, "Global Color Table (GCT) x4 (truncated)");
        assert_eq!((ranges[2].start, ranges[2].length), (13, 5));
    }

    #[test]
    fn test_image_with_local_color_table() {
        let mut body = vec![0x2C, 0, 0, 0, 0, 0x01, 0, 0x01, 0, 0x80];
        body.extend_from_slice(&[0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF]);
        body.extend_from_slice(&[0x02, 0x02, 0x44, 0x01, 0x00, 0x3B]);
        let data = gif(0x00, &body);
        let ranges = scan(&data);

        assert_eq!(
            kinds(&ranges[2..]),
            vec![
                BlockKind::ImageDescriptor,
                BlockKind::LocalColorTable,
                BlockKind::ImageData,
                BlockKind::Trailer
            ]
        );
        assert_eq!(ranges[3].name, "Local Color Table (LCT) x2");
        assert_eq!((ranges[3].start, ranges[3].length), (23, 6));
        assert_eq!((ranges[4].start, ranges[4].length), (29, 5));
        assert!(!ranges[4].is_truncated());
    }

    #[test]
    fn test_truncated_image_descriptor() {
        let data = gif(0x00, &[0x2C, 0x00, 0x00, 0x00]);
        let ranges = scan(&data);

        let last = ranges.last().unwrap();
        assert_eq!(last.name, "Image Descriptor (truncated)");
        assert_eq!((last.start, last.length), (13, 4));
    }

    #[test]
    fn test_image_data_unterminated() {
        let body = [0x2C, 0, 0, 0, 0, 0x01, 0, 0x01, 0, 0x00, 0x02, 0x05, 0x01];
        let data = gif(0x00, &body);
        let ranges = scan(&data);

        let last = ranges.last().unwrap();
        assert_eq!(last.kind, BlockKind::ImageData);
        assert!(last.is_truncated());
        assert_eq!(last.end_exclusive(), data.len());
    }

    #[test]
    fn test_image_data_missing() {
        let body = [0x2C, 0, 0, 0, 0, 0x01, 0, 0x01, 0, 0x00];
        let data = gif(0x00, &body);
        let ranges = scan(&data);

        let last = ranges.last().unwrap();
        assert_eq!(last.kind, BlockKind::ImageData);
        assert_eq!((last.start, last.length), (23, 0));
        assert!(last.is_truncated());
    }
}
