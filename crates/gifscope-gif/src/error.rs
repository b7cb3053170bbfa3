//! Error types for GIF parsing.

use thiserror::Error;

/// Errors that can occur when working with GIF files.
///
/// Only header parsing and the byte arena can fail. Structural scanning
/// and offset description always produce a result.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] gifscope_common::Error),

    /// Buffer too small to hold the header and logical screen descriptor.
    #[error("file is too small to be a valid GIF: {0} bytes, need at least 13")]
    TooSmall(usize),

    /// Signature or version not recognised.
    #[error("not a supported GIF: signature '{signature}', version '{version}'")]
    UnsupportedSignature { signature: String, version: String },

    /// Offset outside the buffer.
    #[error("offset {offset} out of bounds (buffer size: {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },

    /// The edit policy refused a byte write.
    #[error("edit denied at offset {offset:#010x}")]
    EditDenied { offset: usize },
}

impl Error {
    /// Whether this error rejects the file format itself.
    ///
    /// Callers must not run the structure scanner after a format error.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::TooSmall(_) | Error::UnsupportedSignature { .. } | Error::Common(_)
        )
    }
}

/// Result type for GIF operations.
pub type Result<T> = std::result::Result<T, Error>;
