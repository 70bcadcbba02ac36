//! Highlighting, both structural (from the syntax tree) and stream-based
//! (from the engine's token list).
//!
//! The two paths never combine in one pass. The tree highlighter marks
//! errors through the `Error` nodes embedded in the tree, while the stream
//! classifier marks them through the error ranges returned by `tokenize`.

mod classifier;
mod style;

pub use classifier::{HighlightSpan, Scope, TokenClassifier, style_at};
pub use style::{StyleCategory, node_style, token_style};

use crate::syntax::{SyntaxNode, SyntaxTree};

/// Structural highlighting: every byte takes the style of the innermost
/// styled node covering it. Spans are ordered and never overlap.
pub fn highlight_tree(tree: &SyntaxTree) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut stack = vec![Frame::enter(tree, tree.root(), None)];
    while let Some(frame) = stack.last_mut() {
        match frame.children.next() {
            Some(child) => {
                push_span(&mut spans, frame.cursor, child.start, frame.style);
                frame.cursor = frame.cursor.max(child.end);
                let style = frame.style;
                stack.push(Frame::enter(tree, child, style));
            }
            None => {
                push_span(&mut spans, frame.cursor, frame.end, frame.style);
                stack.pop();
            }
        }
    }
    spans
}

/// A node being painted: gaps between its children take its style.
struct Frame {
    style: Option<StyleCategory>,
    cursor: usize,
    end: usize,
    children: std::vec::IntoIter<SyntaxNode>,
}

impl Frame {
    fn enter(tree: &SyntaxTree, node: SyntaxNode, inherited: Option<StyleCategory>) -> Self {
        Self {
            style: node_style(node.kind).or(inherited),
            cursor: node.start,
            end: node.end,
            children: tree.children(node.id).into_iter(),
        }
    }
}

fn push_span(spans: &mut Vec<HighlightSpan>, start: usize, end: usize, style: Option<StyleCategory>) {
    let Some(style) = style else {
        return;
    };
    if start >= end {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.end == start && last.style == style => last.end = end,
        _ => spans.push(HighlightSpan { start, end, style }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{EngineNodeId, ParseNode};
    use crate::syntax::build_tree_buffer;

    #[test]
    fn test_innermost_style_wins() {
        // ([x]) with the engine wrapping the column in a literal-styled node
        let tree = ParseNode::branch(
            EngineNodeId::EXPRESSION,
            0,
            5,
            vec![ParseNode::branch(
                EngineNodeId::PAREN_EXPR,
                0,
                5,
                vec![
                    ParseNode::leaf(EngineNodeId::LPAREN, 0, 1),
                    ParseNode::branch(
                        EngineNodeId::LITERAL,
                        1,
                        4,
                        vec![ParseNode::leaf(EngineNodeId::COLUMN_REF, 2, 3)],
                    ),
                    ParseNode::leaf(EngineNodeId::RPAREN, 4, 5),
                ],
            )],
        );
        let tree = SyntaxTree::new(build_tree_buffer(Some(&tree), 5));
        let spans = highlight_tree(&tree);
        assert_eq!(
            spans,
            vec![
                HighlightSpan { start: 0, end: 1, style: StyleCategory::Paren },
                HighlightSpan { start: 1, end: 2, style: StyleCategory::Literal },
                HighlightSpan { start: 2, end: 3, style: StyleCategory::VariableName },
                HighlightSpan { start: 3, end: 4, style: StyleCategory::Literal },
                HighlightSpan { start: 4, end: 5, style: StyleCategory::Paren },
            ]
        );
    }

    #[test]
    fn test_error_nodes_paint_invalid() {
        let tree = ParseNode::branch(
            EngineNodeId::EXPRESSION,
            0,
            3,
            vec![
                ParseNode::leaf(EngineNodeId::INTEGER_LITERAL, 0, 1),
                ParseNode::leaf(EngineNodeId::ERROR, 1, 3),
            ],
        );
        let tree = SyntaxTree::new(build_tree_buffer(Some(&tree), 3));
        let spans = highlight_tree(&tree);
        assert_eq!(style_at(&spans, 0), Some(StyleCategory::Number));
        assert_eq!(style_at(&spans, 2), Some(StyleCategory::Invalid));
    }

    #[test]
    fn test_empty_tree_has_no_spans() {
        assert!(highlight_tree(&SyntaxTree::empty()).is_empty());
    }
}
