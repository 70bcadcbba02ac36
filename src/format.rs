//! Whole-document formatting through the engine.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::editor::{EditorHost, TextChange, Transaction, UserEvent};
use crate::error::BridgeResult;
use crate::gateway::{AnalyzerSession, FormatOptions};

const LOG_TARGET: &str = "exprbridge::format";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FormatOutcome {
    Unchanged,
    /// `changed_lines` counts removed plus inserted lines.
    Changed { changed_lines: usize },
}

/// Number of lines that differ between `old` and `new`.
pub fn changed_lines(old: &str, new: &str) -> usize {
    TextDiff::from_lines(old, new)
        .iter_all_changes()
        .filter(|change| change.tag() != ChangeTag::Equal)
        .count()
}

#[derive(Debug, Clone, Default)]
pub struct FormatAction {
    options: FormatOptions,
}

impl FormatAction {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    fn run_engine(&self, session: &AnalyzerSession, text: &str) -> BridgeResult<String> {
        let analyzer = session.analyzer()?;
        if self.options.is_empty() {
            analyzer.format(text)
        } else {
            analyzer.format_with_options(text, &self.options)
        }
    }

    /// Formatted text, or `None` when formatting fails or changes nothing.
    pub fn formatted(&self, session: &AnalyzerSession, text: &str) -> Option<String> {
        match self.run_engine(session, text) {
            Ok(formatted) if formatted == text => None,
            Ok(formatted) => Some(formatted),
            Err(err) => {
                log::error!(target: LOG_TARGET, "Failed to format expression: {}", err);
                None
            }
        }
    }

    /// Format the host's document, replacing it in one transaction if the
    /// result differs.
    pub fn run<H: EditorHost + ?Sized>(
        &self,
        session: &AnalyzerSession,
        host: &mut H,
    ) -> FormatOutcome {
        let current = host.text().to_string();
        let Some(formatted) = self.formatted(session, &current) else {
            return FormatOutcome::Unchanged;
        };

        let changed_lines = changed_lines(&current, &formatted);
        log::debug!(
            target: LOG_TARGET,
            "Formatting changed {} lines",
            changed_lines
        );
        host.dispatch(Transaction {
            change: TextChange {
                from: 0,
                to: current.len(),
                insert: formatted,
            },
            selection: None,
            user_event: UserEvent::Format,
        });
        FormatOutcome::Changed { changed_lines }
    }
}
