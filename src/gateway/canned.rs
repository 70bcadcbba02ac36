//! Scripted engine for tests and offline use.
//!
//! Responses are keyed by the exact input text. Unknown inputs get the
//! engine's "nothing found" answer: no tokens, no tree, no errors, and
//! formatting returns the input unchanged.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::model::{EngineError, FormatOptions, ParseTreeResult, TokenizeResult};
use super::{Analyzer, Operation};
use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Default)]
struct CallCounts {
    tokenize: AtomicUsize,
    parse_tree: AtomicUsize,
    lint: AtomicUsize,
    validate: AtomicUsize,
    format: AtomicUsize,
    format_with_options: AtomicUsize,
}

impl CallCounts {
    fn counter(&self, operation: Operation) -> &AtomicUsize {
        match operation {
            Operation::Tokenize => &self.tokenize,
            Operation::ParseTree => &self.parse_tree,
            Operation::Lint => &self.lint,
            Operation::Validate => &self.validate,
            Operation::Format => &self.format,
            Operation::FormatWithOptions => &self.format_with_options,
        }
    }

    fn record(&self, operation: Operation) {
        self.counter(operation).fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct CannedAnalyzer {
    tokens: HashMap<String, TokenizeResult>,
    trees: HashMap<String, ParseTreeResult>,
    lints: HashMap<String, Vec<EngineError>>,
    formats: HashMap<String, String>,
    format_failure: Option<String>,
    calls: CallCounts,
}

impl CannedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(mut self, text: impl Into<String>, result: TokenizeResult) -> Self {
        self.tokens.insert(text.into(), result);
        self
    }

    pub fn with_tree(mut self, text: impl Into<String>, result: ParseTreeResult) -> Self {
        self.trees.insert(text.into(), result);
        self
    }

    pub fn with_lint(mut self, text: impl Into<String>, errors: Vec<EngineError>) -> Self {
        self.lints.insert(text.into(), errors);
        self
    }

    pub fn with_format(mut self, text: impl Into<String>, formatted: impl Into<String>) -> Self {
        self.formats.insert(text.into(), formatted.into());
        self
    }

    /// Make every format call fail with `message`.
    pub fn failing_format(mut self, message: impl Into<String>) -> Self {
        self.format_failure = Some(message.into());
        self
    }

    /// Number of times `operation` has been called.
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls.counter(operation).load(Ordering::SeqCst)
    }

    fn formatted(&self, text: &str) -> BridgeResult<String> {
        if let Some(message) = &self.format_failure {
            return Err(BridgeError::engine(message.clone()));
        }
        Ok(self
            .formats
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

impl Analyzer for CannedAnalyzer {
    fn tokenize(&self, text: &str) -> BridgeResult<TokenizeResult> {
        self.calls.record(Operation::Tokenize);
        Ok(self.tokens.get(text).cloned().unwrap_or_default())
    }

    fn parse_tree(&self, text: &str) -> BridgeResult<ParseTreeResult> {
        self.calls.record(Operation::ParseTree);
        Ok(self.trees.get(text).cloned().unwrap_or_default())
    }

    fn lint(&self, text: &str) -> BridgeResult<Vec<EngineError>> {
        self.calls.record(Operation::Lint);
        Ok(self.lints.get(text).cloned().unwrap_or_default())
    }

    fn validate(&self, text: &str) -> BridgeResult<bool> {
        self.calls.record(Operation::Validate);
        Ok(self.lints.get(text).is_none_or(Vec::is_empty))
    }

    fn format(&self, text: &str) -> BridgeResult<String> {
        self.calls.record(Operation::Format);
        self.formatted(text)
    }

    fn format_with_options(&self, text: &str, _options: &FormatOptions) -> BridgeResult<String> {
        self.calls.record(Operation::FormatWithOptions);
        self.formatted(text)
    }
}
