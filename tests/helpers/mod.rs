//! Scripted analyzer fixtures shared by the integration tests.
//!
//! Each fixture is the engine's answer for one document, written out by hand
//! so the tests never need the shared library.

#![allow(dead_code)]

use std::sync::Arc;

use exprbridge::{AnalyzerSession, EditorSession};
use exprbridge::completion::FunctionRegistry;
use exprbridge::gateway::{
    CannedAnalyzer, EngineError, EngineNodeId, ParseNode, ParseTreeResult, SharedAnalyzer, Token,
    TokenKind, TokenizeResult,
};

pub(crate) const ARITHMETIC: &str = "[column1] + [column2] * 2";
pub(crate) const MAX_CALL: &str = "MAX([a], 1)";
pub(crate) const TRAILING_COMMA: &str = "MAX(1,)";

fn column_ref(start: usize, end: usize) -> ParseNode {
    ParseNode::branch(
        EngineNodeId::COLUMN_REF_EXPR,
        start,
        end,
        vec![ParseNode::branch(
            EngineNodeId::COLUMN_REFERENCE,
            start,
            end,
            vec![
                ParseNode::leaf(EngineNodeId::LBRACKET, start, start + 1),
                ParseNode::leaf(EngineNodeId::COLUMN_REF, start + 1, end - 1),
                ParseNode::leaf(EngineNodeId::RBRACKET, end - 1, end),
            ],
        )],
    )
}

fn integer(start: usize, end: usize) -> ParseNode {
    ParseNode::branch(
        EngineNodeId::LITERAL_EXPR,
        start,
        end,
        vec![ParseNode::branch(
            EngineNodeId::LITERAL,
            start,
            end,
            vec![ParseNode::leaf(EngineNodeId::INTEGER_LITERAL, start, end)],
        )],
    )
}

fn tokens(layout: &[(TokenKind, usize, usize)], text: &str) -> Vec<Token> {
    layout.iter()
        .map(|&(kind, start, end)| Token::new(kind, &text[start..end], start, end))
        .collect()
}

/// `[column1] + [column2] * 2`
pub(crate) fn arithmetic_tokens() -> TokenizeResult {
    use TokenKind::*;
    TokenizeResult {
        tokens: tokens(
            &[
                (LeftBracket, 0, 1),
                (ColumnReference, 1, 8),
                (RightBracket, 8, 9),
                (Whitespace, 9, 10),
                (Operator, 10, 11),
                (Whitespace, 11, 12),
                (LeftBracket, 12, 13),
                (ColumnReference, 13, 20),
                (RightBracket, 20, 21),
                (Whitespace, 21, 22),
                (Operator, 22, 23),
                (Whitespace, 23, 24),
                (Integer, 24, 25),
                (EndOfInput, 25, 25),
            ],
            ARITHMETIC,
        ),
        errors: vec![],
    }
}

pub(crate) fn arithmetic_tree() -> ParseTreeResult {
    ParseTreeResult {
        tree: Some(ParseNode::branch(
            EngineNodeId::EXPRESSION,
            0,
            25,
            vec![ParseNode::branch(
                EngineNodeId::ADD_SUB_EXPR,
                0,
                25,
                vec![
                    column_ref(0, 9),
                    ParseNode::leaf(EngineNodeId::ADD, 10, 11),
                    ParseNode::branch(
                        EngineNodeId::MUL_DIV_EXPR,
                        12,
                        25,
                        vec![
                            column_ref(12, 21),
                            ParseNode::leaf(EngineNodeId::MUL, 22, 23),
                            integer(24, 25),
                        ],
                    ),
                ],
            )],
        )),
        errors: vec![],
    }
}

/// `MAX([a], 1)`
pub(crate) fn max_call_tree() -> ParseTreeResult {
    ParseTreeResult {
        tree: Some(ParseNode::branch(
            EngineNodeId::EXPRESSION,
            0,
            11,
            vec![ParseNode::branch(
                EngineNodeId::FUNCTION_CALL_EXPR,
                0,
                11,
                vec![ParseNode::branch(
                    EngineNodeId::FUNCTION_CALL,
                    0,
                    11,
                    vec![
                        ParseNode::leaf(EngineNodeId::FUNCTION_NAME, 0, 3),
                        ParseNode::leaf(EngineNodeId::LPAREN, 3, 4),
                        ParseNode::branch(
                            EngineNodeId::ARGUMENT_LIST,
                            4,
                            10,
                            vec![
                                column_ref(4, 7),
                                ParseNode::leaf(EngineNodeId::COMMA, 7, 8),
                                integer(9, 10),
                            ],
                        ),
                        ParseNode::leaf(EngineNodeId::RPAREN, 10, 11),
                    ],
                )],
            )],
        )),
        errors: vec![],
    }
}

pub(crate) fn max_call_tokens() -> TokenizeResult {
    use TokenKind::*;
    TokenizeResult {
        tokens: tokens(
            &[
                (FunctionName, 0, 3),
                (LeftParen, 3, 4),
                (LeftBracket, 4, 5),
                (ColumnReference, 5, 6),
                (RightBracket, 6, 7),
                (Comma, 7, 8),
                (Whitespace, 8, 9),
                (Integer, 9, 10),
                (RightParen, 10, 11),
                (EndOfInput, 11, 11),
            ],
            MAX_CALL,
        ),
        errors: vec![],
    }
}

/// `MAX(1,)`: the closing paren is where the engine gives up.
pub(crate) fn trailing_comma_tokens() -> TokenizeResult {
    use TokenKind::*;
    TokenizeResult {
        tokens: tokens(
            &[
                (FunctionName, 0, 3),
                (LeftParen, 3, 4),
                (Integer, 4, 5),
                (Comma, 5, 6),
                (RightParen, 6, 7),
                (EndOfInput, 7, 7),
            ],
            TRAILING_COMMA,
        ),
        errors: vec![trailing_comma_error()],
    }
}

pub(crate) fn trailing_comma_error() -> EngineError {
    let mut error = EngineError::new("Unexpected token ')'", 6, 7);
    error.line = 1;
    error.column = 6;
    error
}

pub(crate) fn trailing_comma_tree() -> ParseTreeResult {
    ParseTreeResult {
        tree: Some(ParseNode::branch(
            EngineNodeId::EXPRESSION,
            0,
            7,
            vec![ParseNode::branch(
                EngineNodeId::FUNCTION_CALL,
                0,
                7,
                vec![
                    ParseNode::leaf(EngineNodeId::FUNCTION_NAME, 0, 3),
                    ParseNode::leaf(EngineNodeId::LPAREN, 3, 4),
                    ParseNode::branch(
                        EngineNodeId::ARGUMENT_LIST,
                        4,
                        6,
                        vec![
                            integer(4, 5),
                            ParseNode::leaf(EngineNodeId::COMMA, 5, 6),
                        ],
                    ),
                    ParseNode::leaf(EngineNodeId::ERROR, 6, 7),
                ],
            )],
        )),
        errors: vec![trailing_comma_error()],
    }
}

/// An analyzer that knows every fixture document.
pub(crate) fn fixture_analyzer() -> CannedAnalyzer {
    CannedAnalyzer::new()
        .with_tokens(ARITHMETIC, arithmetic_tokens())
        .with_tree(ARITHMETIC, arithmetic_tree())
        .with_tokens(MAX_CALL, max_call_tokens())
        .with_tree(MAX_CALL, max_call_tree())
        .with_tokens(TRAILING_COMMA, trailing_comma_tokens())
        .with_tree(TRAILING_COMMA, trailing_comma_tree())
        .with_lint(TRAILING_COMMA, vec![trailing_comma_error()])
}

pub(crate) fn session_for(analyzer: Arc<CannedAnalyzer>) -> Arc<AnalyzerSession> {
    Arc::new(AnalyzerSession::with_analyzer(analyzer as SharedAnalyzer))
}

pub(crate) fn editor_for(analyzer: Arc<CannedAnalyzer>) -> EditorSession {
    EditorSession::new(session_for(analyzer), Arc::new(FunctionRegistry::builtin()))
}
