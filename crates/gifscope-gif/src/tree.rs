//! Hierarchical view of the scanned blocks.
//!
//! The flat range list is grouped top-down into a tree: the header, screen
//! descriptor and global color table sit at the top level, and every image
//! descriptor opens a `Frame N` node that collects its local color table,
//! its image data and the graphic control extensions directly before it.

use crate::{BlockKind, ByteRange};

/// A node in the structure tree.
///
/// Each node owns its children outright; there are no parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructureNode {
    title: String,
    range: Option<ByteRange>,
    frame_index: Option<usize>,
    children: Vec<StructureNode>,
}

impl StructureNode {
    /// Create a node with no range.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            range: None,
            frame_index: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node for a range, titled with the range name.
    pub fn from_range(range: ByteRange) -> Self {
        Self {
            title: range.name.clone(),
            range: Some(range),
            frame_index: None,
            children: Vec::new(),
        }
    }

    /// Create a frame node.
    pub fn frame(index: usize) -> Self {
        Self {
            title: format!("Frame {}", index),
            range: None,
            frame_index: Some(index),
            children: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn range(&self) -> Option<&ByteRange> {
        self.range.as_ref()
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// Frame number when this node is a frame.
    pub fn frame_index(&self) -> Option<usize> {
        self.frame_index
    }

    pub fn children(&self) -> &[StructureNode] {
        &self.children
    }

    pub fn add_child(&mut self, child: StructureNode) {
        self.children.push(child);
    }

    /// Get the total number of nodes in this tree (including self).
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(|c| c.count()).sum::<usize>()
    }

    /// Get the depth of this tree.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Iterate over the frame nodes, in frame order.
    pub fn frames(&self) -> impl Iterator<Item = &StructureNode> {
        self.iter().filter(|n| n.frame_index.is_some())
    }

    /// Iterate over all nodes in the tree (pre-order traversal).
    pub fn iter(&self) -> StructureIter<'_> {
        StructureIter { stack: vec![self] }
    }
}

/// Iterator over all nodes in a structure tree.
pub struct StructureIter<'a> {
    stack: Vec<&'a StructureNode>,
}

impl<'a> Iterator for StructureIter<'a> {
    type Item = &'a StructureNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Group a flat range list into a tree rooted at a `GIF` node.
///
/// Frame numbering starts at 0 and increments once per image descriptor,
/// in scan order.
pub fn build_tree(ranges: &[ByteRange]) -> StructureNode {
    let mut root = StructureNode::new("GIF");
    let mut frame: Option<StructureNode> = None;
    let mut pending: Vec<ByteRange> = Vec::new();
    let mut next_frame = 0;

    for range in ranges {
        match range.kind {
            BlockKind::LocalColorTable | BlockKind::ImageData if frame.is_some() => {
                if let Some(current) = frame.as_mut() {
                    current.add_child(StructureNode::from_range(range.clone()));
                }
            }
            BlockKind::ImageDescriptor => {
                if let Some(done) = frame.take() {
                    root.add_child(done);
                }

                let mut current = StructureNode::frame(next_frame);
                next_frame += 1;
                for gce in pending.drain(..) {
                    current.add_child(StructureNode::from_range(gce));
                }
                current.add_child(StructureNode::from_range(range.clone()));
                frame = Some(current);
            }
            BlockKind::GraphicControlExtension => {
                if let Some(done) = frame.take() {
                    root.add_child(done);
                }
                pending.push(range.clone());
            }
            _ => {
                if let Some(done) = frame.take() {
                    root.add_child(done);
                }
                for gce in pending.drain(..) {
                    root.add_child(StructureNode::from_range(gce));
                }
                root.add_child(StructureNode::from_range(range.clone()));
            }
        }
    }

    if let Some(done) = frame.take() {
        root.add_child(done);
    }
    for gce in pending.drain(..) {
        root.add_child(StructureNode::from_range(gce));
    }

    root
}
