//! Style categories and the kind → style tables.

use serde::Serialize;

use crate::gateway::TokenKind;
use crate::syntax::NodeKind;

/// Editor style category. The host maps these onto its theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleCategory {
    String,
    Number,
    Bool,
    VariableName,
    Function,
    Keyword,
    Operator,
    Punctuation,
    Paren,
    Literal,
    Invalid,
}

impl StyleCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleCategory::String => "string",
            StyleCategory::Number => "number",
            StyleCategory::Bool => "bool",
            StyleCategory::VariableName => "variableName",
            StyleCategory::Function => "function",
            StyleCategory::Keyword => "keyword",
            StyleCategory::Operator => "operator",
            StyleCategory::Punctuation => "punctuation",
            StyleCategory::Paren => "paren",
            StyleCategory::Literal => "literal",
            StyleCategory::Invalid => "invalid",
        }
    }
}

/// Style for a token in the stream tokenizer. Function names are painted
/// as keywords there; brackets take the column-reference color.
pub fn token_style(kind: TokenKind) -> Option<StyleCategory> {
    match kind {
        TokenKind::StringLiteral => Some(StyleCategory::String),
        TokenKind::Integer | TokenKind::Float => Some(StyleCategory::Number),
        TokenKind::Boolean => Some(StyleCategory::Bool),
        TokenKind::ColumnReference => Some(StyleCategory::VariableName),
        TokenKind::FunctionName => Some(StyleCategory::Keyword),
        TokenKind::Operator => Some(StyleCategory::Operator),
        TokenKind::Comma => Some(StyleCategory::Punctuation),
        TokenKind::LeftParen | TokenKind::RightParen => Some(StyleCategory::Paren),
        TokenKind::LeftBracket | TokenKind::RightBracket => Some(StyleCategory::VariableName),
        TokenKind::Whitespace | TokenKind::EndOfInput => None,
        TokenKind::Error => Some(StyleCategory::Invalid),
    }
}

/// Style for a node of the structural tree. Unstyled nodes inherit from the
/// nearest styled ancestor.
pub fn node_style(kind: NodeKind) -> Option<StyleCategory> {
    match kind {
        NodeKind::StringLiteral => Some(StyleCategory::String),
        NodeKind::IntegerLiteral | NodeKind::FloatLiteral => Some(StyleCategory::Number),
        NodeKind::BooleanLiteral => Some(StyleCategory::Bool),
        NodeKind::FunctionName => Some(StyleCategory::Function),
        NodeKind::ColumnReference | NodeKind::ColumnName => Some(StyleCategory::VariableName),
        NodeKind::Literal => Some(StyleCategory::Literal),
        NodeKind::ArithmeticOperator
        | NodeKind::ComparisonOperator
        | NodeKind::LogicalOperator => Some(StyleCategory::Operator),
        NodeKind::Paren => Some(StyleCategory::Paren),
        NodeKind::Comma => Some(StyleCategory::Punctuation),
        NodeKind::Error => Some(StyleCategory::Invalid),
        _ => None,
    }
}
