//! Consumer-side node kinds and the translation from engine identifiers.

use serde::Serialize;

use crate::gateway::EngineNodeId;

/// Node kinds of the editor-facing tree, numbered contiguously from zero.
///
/// Lexical engine kinds that carry the same meaning for highlighting are
/// folded together (all arithmetic operators become `ArithmeticOperator`,
/// both parentheses become `Paren`, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum NodeKind {
    Expression,
    LiteralExpr,
    ColumnRefExpr,
    FunctionCallExpr,
    ParenExpr,
    UnaryMinusExpr,
    PowerExpr,
    MulDivExpr,
    AddSubExpr,
    ComparisonExpr,
    AndExpr,
    OrExpr,
    Literal,
    ColumnReference,
    FunctionCall,
    ArgumentList,
    BooleanLiteral,
    FloatLiteral,
    IntegerLiteral,
    StringLiteral,
    FunctionName,
    ColumnName,
    ArithmeticOperator,
    ComparisonOperator,
    LogicalOperator,
    Paren,
    Bracket,
    Comma,
    Error,
}

impl NodeKind {
    pub const ALL: [NodeKind; 29] = [
        NodeKind::Expression,
        NodeKind::LiteralExpr,
        NodeKind::ColumnRefExpr,
        NodeKind::FunctionCallExpr,
        NodeKind::ParenExpr,
        NodeKind::UnaryMinusExpr,
        NodeKind::PowerExpr,
        NodeKind::MulDivExpr,
        NodeKind::AddSubExpr,
        NodeKind::ComparisonExpr,
        NodeKind::AndExpr,
        NodeKind::OrExpr,
        NodeKind::Literal,
        NodeKind::ColumnReference,
        NodeKind::FunctionCall,
        NodeKind::ArgumentList,
        NodeKind::BooleanLiteral,
        NodeKind::FloatLiteral,
        NodeKind::IntegerLiteral,
        NodeKind::StringLiteral,
        NodeKind::FunctionName,
        NodeKind::ColumnName,
        NodeKind::ArithmeticOperator,
        NodeKind::ComparisonOperator,
        NodeKind::LogicalOperator,
        NodeKind::Paren,
        NodeKind::Bracket,
        NodeKind::Comma,
        NodeKind::Error,
    ];

    /// Index of this kind in the consumer's kind space.
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<NodeKind> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Translate an engine identifier, falling back to `Expression` for
    /// anything the table does not know.
    pub fn from_engine(id: EngineNodeId) -> NodeKind {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| ENGINE_KINDS.get(index).copied().flatten())
            .unwrap_or(NodeKind::Expression)
    }

    pub fn is_error(self) -> bool {
        self == NodeKind::Error
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Expression => "Expression",
            NodeKind::LiteralExpr => "LiteralExpr",
            NodeKind::ColumnRefExpr => "ColumnRefExpr",
            NodeKind::FunctionCallExpr => "FunctionCallExpr",
            NodeKind::ParenExpr => "ParenExpr",
            NodeKind::UnaryMinusExpr => "UnaryMinusExpr",
            NodeKind::PowerExpr => "PowerExpr",
            NodeKind::MulDivExpr => "MulDivExpr",
            NodeKind::AddSubExpr => "AddSubExpr",
            NodeKind::ComparisonExpr => "ComparisonExpr",
            NodeKind::AndExpr => "AndExpr",
            NodeKind::OrExpr => "OrExpr",
            NodeKind::Literal => "Literal",
            NodeKind::ColumnReference => "ColumnReference",
            NodeKind::FunctionCall => "FunctionCall",
            NodeKind::ArgumentList => "ArgumentList",
            NodeKind::BooleanLiteral => "BooleanLiteral",
            NodeKind::FloatLiteral => "FloatLiteral",
            NodeKind::IntegerLiteral => "IntegerLiteral",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::FunctionName => "FunctionName",
            NodeKind::ColumnName => "ColumnName",
            NodeKind::ArithmeticOperator => "ArithmeticOperator",
            NodeKind::ComparisonOperator => "ComparisonOperator",
            NodeKind::LogicalOperator => "LogicalOperator",
            NodeKind::Paren => "Paren",
            NodeKind::Bracket => "Bracket",
            NodeKind::Comma => "Comma",
            NodeKind::Error => "Error",
        }
    }
}

/// Dense table indexed by engine identifier. `None` entries (whitespace and
/// bare terminals) take the `Expression` fallback.
const ENGINE_KINDS: [Option<NodeKind>; 44] = [
    Some(NodeKind::Expression),       // 0 Expression
    Some(NodeKind::LiteralExpr),      // 1
    Some(NodeKind::ColumnRefExpr),    // 2
    Some(NodeKind::FunctionCallExpr), // 3
    Some(NodeKind::ParenExpr),        // 4
    Some(NodeKind::UnaryMinusExpr),   // 5
    Some(NodeKind::PowerExpr),        // 6
    Some(NodeKind::MulDivExpr),       // 7
    Some(NodeKind::AddSubExpr),       // 8
    Some(NodeKind::ComparisonExpr),   // 9
    Some(NodeKind::AndExpr),          // 10
    Some(NodeKind::OrExpr),           // 11
    Some(NodeKind::Literal),          // 12
    Some(NodeKind::ColumnReference),  // 13
    Some(NodeKind::FunctionCall),     // 14
    Some(NodeKind::ArgumentList),     // 15
    Some(NodeKind::ArithmeticOperator), // 16 Add
    Some(NodeKind::ArithmeticOperator), // 17 Sub
    Some(NodeKind::ArithmeticOperator), // 18 Mul
    Some(NodeKind::ArithmeticOperator), // 19 Div
    Some(NodeKind::ArithmeticOperator), // 20 Pow
    Some(NodeKind::ComparisonOperator), // 21 Lt
    Some(NodeKind::ComparisonOperator), // 22 Le
    Some(NodeKind::ComparisonOperator), // 23 Gt
    Some(NodeKind::ComparisonOperator), // 24 Ge
    Some(NodeKind::ComparisonOperator), // 25 Eq
    Some(NodeKind::ComparisonOperator), // 26 Neq
    Some(NodeKind::LogicalOperator),  // 27 Or
    Some(NodeKind::LogicalOperator),  // 28 And
    Some(NodeKind::Paren),            // 29 LParen
    Some(NodeKind::Paren),            // 30 RParen
    Some(NodeKind::Bracket),          // 31 LBracket
    Some(NodeKind::Bracket),          // 32 RBracket
    Some(NodeKind::Comma),            // 33
    Some(NodeKind::BooleanLiteral),   // 34
    Some(NodeKind::FloatLiteral),     // 35
    Some(NodeKind::IntegerLiteral),   // 36
    Some(NodeKind::StringLiteral),    // 37
    Some(NodeKind::FunctionName),     // 38
    Some(NodeKind::ColumnName),       // 39 ColumnRef
    None,                             // 40 WS
    Some(NodeKind::Error),            // 41 ErrorChar
    None,                             // 42 Terminal
    Some(NodeKind::Error),            // 43 Error
];
