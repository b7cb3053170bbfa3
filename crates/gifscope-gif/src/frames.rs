//! Reverse lookup from ranges to the frame that owns them.

use std::collections::HashMap;

use crate::{ByteRange, StructureNode};

/// Map from range to frame index, built once from a structure tree.
#[derive(Debug, Clone, Default)]
pub struct FrameIndex {
    frames: HashMap<ByteRange, usize>,
    frame_count: usize,
}

impl FrameIndex {
    /// Index every range that sits under a frame node.
    pub fn build(tree: &StructureNode) -> Self {
        let mut index = Self::default();

        for frame in tree.frames() {
            let Some(number) = frame.frame_index() else {
                continue;
            };
            index.frame_count += 1;
            for node in frame.iter() {
                if let Some(range) = node.range() {
                    index.frames.insert(range.clone(), number);
                }
            }
        }

        index
    }

    /// Frame owning a range, if any.
    pub fn frame_of(&self, range: &ByteRange) -> Option<usize> {
        self.frames.get(range).copied()
    }

    /// Frame owning the byte at `offset`, if any.
    pub fn frame_at(&self, offset: usize) -> Option<usize> {
        self.frames
            .iter()
            .find(|(range, _)| range.contains(offset))
            .map(|(_, &frame)| frame)
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}
