//! Structural scanner for GIF87a/89a files.
//!
//! Given the raw bytes of a GIF, this crate identifies every logical block,
//! computes its exact byte range and explains what any single byte means.
//! Image data is treated as an opaque range; nothing here decodes LZW.
//!
//! # File Format
//!
//! - 6 bytes: Signature + version (`GIF87a` / `GIF89a`)
//! - 7 bytes: Logical screen descriptor
//! - Global color table *(optional)*
//! - Sequence of blocks:
//!   - Extensions (`0x21`): graphic control, application, others
//!   - Image descriptor (`0x2C`), local color table *(optional)*, image data
//! - Trailer (`0x3B`)
//!
//! Parsing the fixed prefix is the only step that can reject a file. Past
//! that, malformed input degrades: blocks are clipped to the buffer and
//! tagged as truncated, and stray bytes become one-byte unknown ranges.
//!
//! # Example
//!
//! ```no_run
//! use gifscope_gif::{FrameIndex, GifFile};
//!
//! let (file, data) = GifFile::open("animation.gif")?;
//! println!("{}", file.status_line());
//!
//! for range in file.ranges(&data) {
//!     println!("{}", range);
//! }
//!
//! let tree = file.tree(&data);
//! let frames = FrameIndex::build(&tree);
//! println!("{} frames", frames.frame_count());
//!
//! println!("{}", file.describe(&data, 10));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod blocks;
mod describe;
mod edit;
mod error;
mod file;
mod frames;
mod header;
mod hex;
mod range;
mod scanner;
mod tree;

pub use blocks::{ApplicationExtension, GraphicControl, ImageDescriptor};
pub use describe::{describe, inspect, ByteInfo, OUT_OF_BOUNDS, UNKNOWN_REGION};
pub use edit::{ByteArena, ByteEditPolicy};
pub use error::{Error, Result};
pub use file::GifFile;
pub use frames::FrameIndex;
pub use header::{parse, GifHeader, ScreenDescriptor, PREFIX_LEN};
pub use hex::{hex_rows, HexRow, DEFAULT_BYTES_PER_ROW};
pub use range::{BlockKind, ByteRange, TRUNCATED_SUFFIX};
pub use scanner::{build_ranges, sub_block_chain, SubBlockChain};
pub use tree::{build_tree, StructureIter, StructureNode};
