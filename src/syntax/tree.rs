//! Read-only view over a [`TreeBuffer`].
//!
//! Nodes are addressed by their record index. Because records are stored in
//! postorder, the root is always the last record and a node's subtree occupies
//! the `size / 4` records ending at the node itself.

use serde::Serialize;

use super::builder::{RECORD_WIDTH, TreeBuffer};
use super::kind::NodeKind;

/// Record index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
}

impl SyntaxNode {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Which side of a position to prefer when it sits on a node boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    /// Enter nodes that end at the position.
    Before,
    /// Only enter nodes that strictly contain the position.
    Neutral,
    /// Enter nodes that start at the position.
    #[default]
    After,
}

impl Bias {
    fn enters(self, node: &SyntaxNode, pos: usize) -> bool {
        match self {
            Bias::Before => node.start < pos && pos <= node.end,
            Bias::Neutral => node.start < pos && pos < node.end,
            Bias::After => node.start <= pos && pos < node.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    buffer: TreeBuffer,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl SyntaxTree {
    pub fn new(buffer: TreeBuffer) -> Self {
        if buffer.record_count() == 0 {
            return Self::empty();
        }
        Self { buffer }
    }

    pub fn empty() -> Self {
        Self {
            buffer: TreeBuffer::empty(),
        }
    }

    pub fn buffer(&self) -> &TreeBuffer {
        &self.buffer
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.buffer.record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1 && self.root().is_empty()
    }

    pub fn root(&self) -> SyntaxNode {
        let id = NodeId(self.len().saturating_sub(1));
        self.node(id).unwrap_or(SyntaxNode {
            id,
            kind: NodeKind::Expression,
            start: 0,
            end: 0,
        })
    }

    pub fn node(&self, id: NodeId) -> Option<SyntaxNode> {
        let record = self.buffer.record(id.0)?;
        Some(SyntaxNode {
            id,
            kind: record.kind,
            start: record.start as usize,
            end: record.end as usize,
        })
    }

    fn subtree_records(&self, id: NodeId) -> usize {
        self.buffer
            .record(id.0)
            .map(|record| (record.size as usize / RECORD_WIDTH).max(1))
            .unwrap_or(1)
    }

    /// Direct children of `id`, in document order.
    pub fn children(&self, id: NodeId) -> Vec<SyntaxNode> {
        let first = (id.0 + 1).saturating_sub(self.subtree_records(id));
        let mut children = Vec::new();
        let mut cursor = id.0;
        while cursor > first {
            let child = NodeId(cursor - 1);
            let Some(node) = self.node(child) else {
                break;
            };
            children.push(node);
            cursor = (cursor - 1).saturating_sub(self.subtree_records(child) - 1);
        }
        children.reverse();
        children
    }

    /// The deepest node covering `pos`, honoring `bias` at node boundaries.
    /// Falls back to the root when no child qualifies.
    pub fn resolve_inner(&self, pos: usize, bias: Bias) -> SyntaxNode {
        let mut current = self.root();
        'descend: loop {
            for child in self.children(current.id) {
                if bias.enters(&child, pos) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Pre-order walk over every node.
    pub fn walk(&self) -> Vec<(usize, SyntaxNode)> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![(0usize, self.root())];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in self.children(node.id).into_iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}
