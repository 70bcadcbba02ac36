//! The analysis engine's call surface.
//!
//! Everything that inspects expression semantics lives behind [`Analyzer`].
//! Downstream components only see positions, kinds and strings.

pub mod canned;
pub mod library;
pub mod model;
pub mod session;

pub use canned::CannedAnalyzer;
pub use library::LibraryAnalyzer;
pub use model::{
    EngineError, EngineNodeId, FormatOptions, ParseNode, ParseTreeResult, Token, TokenKind,
    TokenizeResult,
};
pub use session::{AnalyzerSession, SharedAnalyzer};

use crate::error::BridgeResult;

/// Gateway operations, used for logging and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Tokenize,
    ParseTree,
    Lint,
    Validate,
    Format,
    FormatWithOptions,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Tokenize => "tokenize",
            Operation::ParseTree => "parseTree",
            Operation::Lint => "lint",
            Operation::Validate => "validate",
            Operation::Format => "format",
            Operation::FormatWithOptions => "formatWithOptions",
        }
    }
}

/// The analysis engine.
///
/// Implementations may be arbitrarily slow and are not assumed to be
/// reentrant; callers never invoke one gateway method from inside another.
pub trait Analyzer: Send + Sync {
    fn tokenize(&self, text: &str) -> BridgeResult<TokenizeResult>;

    fn parse_tree(&self, text: &str) -> BridgeResult<ParseTreeResult>;

    fn lint(&self, text: &str) -> BridgeResult<Vec<EngineError>>;

    fn validate(&self, text: &str) -> BridgeResult<bool>;

    fn format(&self, text: &str) -> BridgeResult<String>;

    fn format_with_options(&self, text: &str, options: &FormatOptions) -> BridgeResult<String>;
}
