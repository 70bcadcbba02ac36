//! Engine lint errors turned into editor diagnostics.

use serde::Serialize;

use crate::gateway::{AnalyzerSession, EngineError};

const LOG_TARGET: &str = "exprbridge::diagnostics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Display payload shown under the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub message: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub start: usize,
    pub end: usize,
    pub severity: Severity,
    pub message: String,
    pub line: i64,
    pub column: i64,
    pub rendered: RenderedMessage,
}

impl Diagnostic {
    /// Convert one engine error, clamping its range into `[0, doc_len]`.
    pub fn from_engine(error: &EngineError, doc_len: usize) -> Self {
        let (start, end) = error.clamped_span(doc_len);
        Self {
            start,
            end,
            severity: Severity::Error,
            message: error.message.clone(),
            line: error.line,
            column: error.column,
            rendered: RenderedMessage {
                message: error.message.clone(),
                position: format!("Line {}, Column {}", error.line, error.column),
            },
        }
    }
}

/// Lint `text` and convert every engine error into a diagnostic.
///
/// Blank input returns nothing without calling the engine. Gateway failures
/// are logged and yield an empty set.
pub fn lint_document(session: &AnalyzerSession, text: &str) -> Vec<Diagnostic> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match session.analyzer().and_then(|analyzer| analyzer.lint(text)) {
        Ok(errors) => errors
            .iter()
            .map(|error| Diagnostic::from_engine(error, text.len()))
            .collect(),
        Err(err) => {
            log::warn!(target: LOG_TARGET, "Lint failed: {}", err);
            Vec::new()
        }
    }
}
