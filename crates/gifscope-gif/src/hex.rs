//! Fixed-width hex rows for dump views.

use crate::describe::printable;

/// Row width used when a caller passes zero.
pub const DEFAULT_BYTES_PER_ROW: usize = 16;

/// One row of a hex dump.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HexRow {
    pub offset: usize,
    pub offset_hex: String,
    pub bytes: Vec<u8>,
    /// Printable ASCII rendering, `.` for everything else.
    pub ascii: String,
}

impl HexRow {
    /// Build a row from a slice of the buffer starting at `offset`.
    pub fn new(offset: usize, slice: &[u8]) -> Self {
        Self {
            offset,
            offset_hex: format!("{:08X}", offset),
            bytes: slice.to_vec(),
            ascii: slice.iter().copied().map(printable).collect(),
        }
    }

    /// Hex text for a column, or `None` past the end of a short row.
    pub fn cell(&self, column: usize) -> Option<String> {
        self.bytes.get(column).map(|b| format!("{:02X}", b))
    }

    /// Whether the row covers `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.offset + self.bytes.len()
    }
}

/// Split a buffer into rows of `bytes_per_row` bytes; the last row may be short.
pub fn hex_rows(data: &[u8], bytes_per_row: usize) -> Vec<HexRow> {
    let width = if bytes_per_row == 0 {
        DEFAULT_BYTES_PER_ROW
    } else {
        bytes_per_row
    };

    data.chunks(width)
        .enumerate()
        .map(|(i, chunk)| HexRow::new(i * width, chunk))
        .collect()
}
