//! Editable buffer and the edit policy seam.
//!
//! The scanner never writes. Byte edits go through a [`ByteArena`] that the
//! caller owns, gated by a [`ByteEditPolicy`] the caller supplies. The arena
//! holds no derived state, so ranges and descriptions are simply recomputed
//! from [`ByteArena::bytes`] after each edit.

use tracing::debug;

use crate::{Error, Result};

/// Decides which offsets may be overwritten.
pub trait ByteEditPolicy {
    fn can_edit(&self, offset: usize) -> bool;
}

impl<F> ByteEditPolicy for F
where
    F: Fn(usize) -> bool,
{
    fn can_edit(&self, offset: usize) -> bool {
        self(offset)
    }
}

/// An owned, mutable file buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteArena {
    bytes: Vec<u8>,
}

impl ByteArena {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read-only view for scanning and description.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrite one byte if the policy allows it.
    pub fn set_byte(&mut self, offset: usize, value: u8, policy: &dyn ByteEditPolicy) -> Result<()> {
        let len = self.bytes.len();
        let slot = self
            .bytes
            .get_mut(offset)
            .ok_or(Error::OffsetOutOfBounds { offset, len })?;

        if !policy.can_edit(offset) {
            return Err(Error::EditDenied { offset });
        }

        debug!(offset, old = *slot, new = value, "byte edit");
        *slot = value;
        Ok(())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for ByteArena {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_byte_allowed() {
        let mut arena = ByteArena::new(vec![0u8; 4]);
        arena.set_byte(2, 0xAB, &|_: usize| true).unwrap();
        assert_eq!(arena.bytes(), &[0, 0, 0xAB, 0]);
    }

    #[test]
    fn test_set_byte_denied() {
        let mut arena = ByteArena::new(vec![0u8; 4]);
        let policy = |offset: usize| offset >= 2;

        assert!(matches!(
            arena.set_byte(1, 0xFF, &policy),
            Err(Error::EditDenied { offset: 1 })
        ));
        assert_eq!(arena.into_inner(), vec![0u8; 4]);
    }

    #[test]
    fn test_set_byte_out_of_bounds() {
        let mut arena = ByteArena::from(vec![0u8; 4]);
        assert!(matches!(
            arena.set_byte(4, 0xFF, &|_: usize| true),
            Err(Error::OffsetOutOfBounds { offset: 4, len: 4 })
        ));
    }
}
