//! Flattening the engine's nested parse tree into a postorder record buffer.
//!
//! Each node becomes four `u32`s: `(kind, start, end, size)`, where `size`
//! is the number of buffer slots covered by the node and its descendants.
//! Children are emitted before their parent, so a consumer can skip a whole
//! subtree by stepping back `size / 4` records.

use crate::gateway::ParseNode;

use super::kind::NodeKind;

pub const RECORD_WIDTH: usize = 4;

const LOG_TARGET: &str = "exprbridge::tree";

/// One decoded buffer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub kind: NodeKind,
    pub start: u32,
    pub end: u32,
    pub size: u32,
}

/// Flat, immutable node buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBuffer {
    data: Vec<u32>,
}

impl TreeBuffer {
    /// A single empty root spanning `[0, 0)`.
    pub fn empty() -> Self {
        Self {
            data: vec![NodeKind::Expression.index(), 0, 0, RECORD_WIDTH as u32],
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Number of node records.
    pub fn record_count(&self) -> usize {
        self.data.len() / RECORD_WIDTH
    }

    pub fn record(&self, index: usize) -> Option<Record> {
        let offset = index.checked_mul(RECORD_WIDTH)?;
        let slots = self.data.get(offset..offset + RECORD_WIDTH)?;
        Some(Record {
            kind: NodeKind::from_index(slots[0]).unwrap_or(NodeKind::Expression),
            start: slots[1],
            end: slots[2],
            size: slots[3],
        })
    }
}

struct Frame<'a> {
    node: &'a ParseNode,
    start: u32,
    end: u32,
    next_child: usize,
    /// Children may not start before this position.
    cursor: u32,
    first_slot: usize,
}

fn clamp(value: usize, low: u32, high: u32) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX).clamp(low, high)
}

/// Build the record buffer for `tree`, analyzed over a document of
/// `doc_len` bytes.
///
/// A missing tree yields [`TreeBuffer::empty`]. Node ranges that violate the
/// containment invariants are clamped: the root is stretched to cover the
/// document, each child is clamped into its parent, and siblings are kept
/// from overlapping their predecessors.
pub fn build_tree_buffer(tree: Option<&ParseNode>, doc_len: usize) -> TreeBuffer {
    let Some(root) = tree else {
        log::debug!(target: LOG_TARGET, "No parse tree, using empty root");
        return TreeBuffer::empty();
    };

    let doc_end = u32::try_from(doc_len).unwrap_or(u32::MAX);
    let mut data: Vec<u32> = Vec::new();
    let mut stack = vec![Frame {
        node: root,
        start: 0,
        end: doc_end,
        next_child: 0,
        cursor: 0,
        first_slot: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let node = frame.node;
        if let Some(child) = node.children.get(frame.next_child) {
            frame.next_child += 1;
            let start = clamp(child.start, frame.cursor, frame.end);
            let end = clamp(child.end, start, frame.end);
            if start as usize != child.start || end as usize != child.end {
                log::debug!(
                    target: LOG_TARGET,
                    "Clamped node {:?} [{}, {}) to [{}, {})",
                    child.kind,
                    child.start,
                    child.end,
                    start,
                    end
                );
            }
            frame.cursor = end;
            stack.push(Frame {
                node: child,
                start,
                end,
                next_child: 0,
                cursor: start,
                first_slot: data.len(),
            });
            continue;
        }

        let Some(frame) = stack.pop() else {
            break;
        };
        let size = (data.len() - frame.first_slot + RECORD_WIDTH) as u32;
        data.extend([
            NodeKind::from_engine(frame.node.kind).index(),
            frame.start,
            frame.end,
            size,
        ]);
    }

    log::trace!(
        target: LOG_TARGET,
        "Built tree buffer with {} records",
        data.len() / RECORD_WIDTH
    );
    TreeBuffer { data }
}
