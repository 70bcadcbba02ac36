//! Values exchanged with the analysis engine.
//!
//! Field names and enum spellings follow the engine's own map encoding so the
//! same types decode JSON payloads from the shared-library exports.

use serde::{Deserialize, Serialize};

/// Lexical category reported by the engine's tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "string")]
    StringLiteral,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "columnReference")]
    ColumnReference,
    #[serde(rename = "function")]
    FunctionName,
    #[serde(rename = "operator")]
    Operator,
    #[serde(rename = "comma")]
    Comma,
    #[serde(rename = "leftParen")]
    LeftParen,
    #[serde(rename = "rightParen")]
    RightParen,
    #[serde(rename = "leftBracket")]
    LeftBracket,
    #[serde(rename = "rightBracket")]
    RightBracket,
    #[serde(rename = "whitespace")]
    Whitespace,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "eof")]
    EndOfInput,
}

impl TokenKind {
    /// Kinds in the order of the engine's C `TokenType` enum.
    const FFI_ORDER: [TokenKind; 15] = [
        TokenKind::StringLiteral,
        TokenKind::Integer,
        TokenKind::Float,
        TokenKind::Boolean,
        TokenKind::ColumnReference,
        TokenKind::FunctionName,
        TokenKind::Operator,
        TokenKind::Comma,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBracket,
        TokenKind::RightBracket,
        TokenKind::Whitespace,
        TokenKind::Error,
        TokenKind::EndOfInput,
    ];

    /// Decode the C enum discriminant. Out-of-range values map to `Error`.
    pub fn from_ffi(value: i32) -> TokenKind {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::FFI_ORDER.get(index).copied())
            .unwrap_or(TokenKind::Error)
    }
}

fn default_true() -> bool {
    true
}

/// A lexical unit. Offsets are UTF-8 byte offsets into the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default)]
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default = "default_true")]
    pub is_valid: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
            line: 1,
            column: start as u32,
            is_valid: true,
        }
    }
}

/// An error as the engine reports it.
///
/// Positions are kept signed: the engine uses `-1` for errors that are not
/// tied to the input (e.g. invalid call arguments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineError {
    pub message: String,
    #[serde(default)]
    pub line: i64,
    #[serde(default)]
    pub column: i64,
    pub start: i64,
    pub end: i64,
}

impl EngineError {
    pub fn new(message: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            message: message.into(),
            line: 1,
            column: start as i64,
            start: start as i64,
            end: end as i64,
        }
    }

    /// The error range clamped into `[0, len]` with `start <= end`.
    pub fn clamped_span(&self, len: usize) -> (usize, usize) {
        let clamp = |value: i64| usize::try_from(value.max(0)).unwrap_or(0).min(len);
        let start = clamp(self.start);
        let end = clamp(self.end).max(start);
        (start, end)
    }
}

/// The engine's node-type identifier. Not contiguous for consumer use; see
/// `syntax::NodeKind` for the translated space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineNodeId(pub u32);

impl EngineNodeId {
    pub const EXPRESSION: Self = Self(0);
    pub const LITERAL_EXPR: Self = Self(1);
    pub const COLUMN_REF_EXPR: Self = Self(2);
    pub const FUNCTION_CALL_EXPR: Self = Self(3);
    pub const PAREN_EXPR: Self = Self(4);
    pub const UNARY_MINUS_EXPR: Self = Self(5);
    pub const POWER_EXPR: Self = Self(6);
    pub const MUL_DIV_EXPR: Self = Self(7);
    pub const ADD_SUB_EXPR: Self = Self(8);
    pub const COMPARISON_EXPR: Self = Self(9);
    pub const AND_EXPR: Self = Self(10);
    pub const OR_EXPR: Self = Self(11);
    pub const LITERAL: Self = Self(12);
    pub const COLUMN_REFERENCE: Self = Self(13);
    pub const FUNCTION_CALL: Self = Self(14);
    pub const ARGUMENT_LIST: Self = Self(15);
    pub const ADD: Self = Self(16);
    pub const SUB: Self = Self(17);
    pub const MUL: Self = Self(18);
    pub const DIV: Self = Self(19);
    pub const POW: Self = Self(20);
    pub const LT: Self = Self(21);
    pub const LE: Self = Self(22);
    pub const GT: Self = Self(23);
    pub const GE: Self = Self(24);
    pub const EQ: Self = Self(25);
    pub const NEQ: Self = Self(26);
    pub const OR: Self = Self(27);
    pub const AND: Self = Self(28);
    pub const LPAREN: Self = Self(29);
    pub const RPAREN: Self = Self(30);
    pub const LBRACKET: Self = Self(31);
    pub const RBRACKET: Self = Self(32);
    pub const COMMA: Self = Self(33);
    pub const BOOLEAN_LITERAL: Self = Self(34);
    pub const FLOAT_LITERAL: Self = Self(35);
    pub const INTEGER_LITERAL: Self = Self(36);
    pub const STRING_LITERAL: Self = Self(37);
    pub const FUNCTION_NAME: Self = Self(38);
    pub const COLUMN_REF: Self = Self(39);
    pub const WS: Self = Self(40);
    pub const ERROR_CHAR: Self = Self(41);
    pub const TERMINAL: Self = Self(42);
    pub const ERROR: Self = Self(43);
}

/// A node of the engine's nested parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseNode {
    #[serde(rename = "type")]
    pub kind: EngineNodeId,
    #[serde(default)]
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn leaf(kind: EngineNodeId, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            start,
            end,
            children: Vec::new(),
        }
    }

    pub fn branch(kind: EngineNodeId, start: usize, end: usize, children: Vec<ParseNode>) -> Self {
        Self {
            kind,
            text: String::new(),
            start,
            end,
            children,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeResult {
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub errors: Vec<EngineError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTreeResult {
    pub tree: Option<ParseNode>,
    #[serde(default)]
    pub errors: Vec<EngineError>,
}

/// Options for `formatWithOptions`. Unset fields keep the engine's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default, alias = "indent_size", skip_serializing_if = "Option::is_none")]
    pub indent_size: Option<u32>,
    #[serde(default, alias = "max_line_length", skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<u32>,
    #[serde(default, alias = "space_around_ops", skip_serializing_if = "Option::is_none")]
    pub space_around_ops: Option<bool>,
    #[serde(
        default,
        alias = "break_long_expressions",
        skip_serializing_if = "Option::is_none"
    )]
    pub break_long_expressions: Option<bool>,
}

impl FormatOptions {
    pub fn is_empty(&self) -> bool {
        self.indent_size.is_none()
            && self.max_line_length.is_none()
            && self.space_around_ops.is_none()
            && self.break_long_expressions.is_none()
    }
}
