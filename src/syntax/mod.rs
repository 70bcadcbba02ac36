//! Editor-facing syntax tree.
//!
//! The engine's nested parse tree is flattened by [`build_tree_buffer`] and
//! read back through [`SyntaxTree`]. Engine node identifiers never leave this
//! module; consumers only see [`NodeKind`].

mod builder;
mod kind;
mod tree;

pub use builder::{RECORD_WIDTH, Record, TreeBuffer, build_tree_buffer};
pub use kind::NodeKind;
pub use tree::{Bias, NodeId, SyntaxNode, SyntaxTree};

use crate::gateway::AnalyzerSession;

const LOG_TARGET: &str = "exprbridge::tree";

/// Parse `text` and build its tree.
///
/// Any gateway failure degrades to an empty root; the error is logged and
/// never returned.
pub fn parse_document(session: &AnalyzerSession, text: &str) -> SyntaxTree {
    if text.trim().is_empty() {
        return SyntaxTree::new(build_tree_buffer(None, text.len()));
    }

    let result = session
        .analyzer()
        .and_then(|analyzer| analyzer.parse_tree(text));
    match result {
        Ok(result) => {
            if result.tree.is_none() {
                log::debug!(
                    target: LOG_TARGET,
                    "Engine returned no tree ({} errors)",
                    result.errors.len()
                );
            }
            SyntaxTree::new(build_tree_buffer(result.tree.as_ref(), text.len()))
        }
        Err(err) => {
            log::warn!(target: LOG_TARGET, "Parse failed, using empty tree: {}", err);
            SyntaxTree::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        CannedAnalyzer, EngineNodeId, Operation, ParseNode, ParseTreeResult, SharedAnalyzer,
    };
    use std::sync::Arc;

    #[test]
    fn test_unavailable_engine_gives_empty_tree() {
        let session = AnalyzerSession::unavailable("no library");
        let tree = parse_document(&session, "1 + 2");
        assert_eq!(tree, SyntaxTree::empty());
    }

    #[test]
    fn test_blank_text_skips_gateway() {
        let analyzer = Arc::new(CannedAnalyzer::new());
        let session = AnalyzerSession::with_analyzer(analyzer.clone() as SharedAnalyzer);
        let tree = parse_document(&session, "   ");
        assert_eq!(tree.len(), 1);
        assert_eq!(analyzer.calls(Operation::ParseTree), 0);
    }

    #[test]
    fn test_parses_through_session() {
        let analyzer = CannedAnalyzer::new().with_tree(
            "42",
            ParseTreeResult {
                tree: Some(ParseNode::branch(
                    EngineNodeId::EXPRESSION,
                    0,
                    2,
                    vec![ParseNode::leaf(EngineNodeId::INTEGER_LITERAL, 0, 2)],
                )),
                errors: vec![],
            },
        );
        let session = AnalyzerSession::with_analyzer(Arc::new(analyzer));
        let tree = parse_document(&session, "42");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(tree.root().id)[0].kind, NodeKind::IntegerLiteral);
    }
}
