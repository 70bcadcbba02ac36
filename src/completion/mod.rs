//! Completion of function names, constants and keywords.

mod registry;

pub use registry::{CompletionCategory, FunctionDescription, FunctionRegistry};

use std::sync::Arc;

use serde::Serialize;

use crate::editor::{TextChange, Transaction, UserEvent};

const LOG_TARGET: &str = "exprbridge::completion";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub category: CompletionCategory,
    pub detail: String,
    pub documentation: String,
}

impl CompletionItem {
    fn fixed(label: &str, category: CompletionCategory, detail: &str, documentation: &str) -> Self {
        Self {
            label: label.to_string(),
            category,
            detail: detail.to_string(),
            documentation: documentation.to_string(),
        }
    }
}

/// Completions replacing the fragment `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionList {
    pub from: usize,
    pub to: usize,
    pub items: Vec<CompletionItem>,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Start of the word run ending at `cursor`.
fn word_start(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(cursor, |(index, _)| index)
}

#[derive(Debug, Clone)]
pub struct CompletionEngine {
    registry: Arc<FunctionRegistry>,
    include_keywords: bool,
}

impl CompletionEngine {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            include_keywords: true,
        }
    }

    /// Whether `true`/`false` and `AND`/`OR` are offered.
    pub fn with_keywords(mut self, include_keywords: bool) -> Self {
        self.include_keywords = include_keywords;
        self
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    fn candidates(&self) -> Vec<CompletionItem> {
        let mut items: Vec<CompletionItem> = self
            .registry
            .iter()
            .map(|function| CompletionItem {
                label: function.name.clone(),
                category: function.category,
                detail: function.detail_text().to_string(),
                documentation: function.info_text().to_string(),
            })
            .collect();
        if self.include_keywords {
            items.extend([
                CompletionItem::fixed(
                    "true",
                    CompletionCategory::Constant,
                    "boolean",
                    "Boolean true value",
                ),
                CompletionItem::fixed(
                    "false",
                    CompletionCategory::Constant,
                    "boolean",
                    "Boolean false value",
                ),
                CompletionItem::fixed(
                    "AND",
                    CompletionCategory::Keyword,
                    "logical operator",
                    "Logical AND operator",
                ),
                CompletionItem::fixed(
                    "OR",
                    CompletionCategory::Keyword,
                    "logical operator",
                    "Logical OR operator",
                ),
            ]);
        }
        items
    }

    /// Completions for the word before `cursor`.
    ///
    /// Without an explicit request nothing is offered when the fragment is
    /// empty or the cursor sits inside a word.
    pub fn complete(&self, text: &str, cursor: usize, explicit: bool) -> Option<CompletionList> {
        if cursor > text.len() || !text.is_char_boundary(cursor) {
            return None;
        }
        let from = word_start(text, cursor);
        let fragment = &text[from..cursor];
        let inside_word = text[cursor..].starts_with(is_word_char);
        if !explicit && (fragment.is_empty() || inside_word) {
            return None;
        }

        let candidates = self.candidates();
        let items = if fragment.is_empty() {
            candidates
        } else {
            let needle = fragment.to_uppercase();
            let (prefixed, rest): (Vec<_>, Vec<_>) = candidates
                .into_iter()
                .filter(|item| item.label.to_uppercase().contains(&needle))
                .partition(|item| item.label.to_uppercase().starts_with(&needle));
            prefixed.into_iter().chain(rest).collect()
        };

        log::debug!(
            target: LOG_TARGET,
            "{} completions for {:?} at {}",
            items.len(),
            fragment,
            cursor
        );
        Some(CompletionList {
            from,
            to: cursor,
            items,
        })
    }
}

/// The transaction that applies `item` over `[from, to)`.
///
/// Functions get an empty argument list with the cursor placed inside it.
pub fn apply_completion(item: &CompletionItem, from: usize, to: usize) -> Transaction {
    let (insert, selection) = match item.category {
        CompletionCategory::Function => {
            let insert = format!("{}()", item.label);
            let selection = from + insert.len() - 1;
            (insert, selection)
        }
        _ => (item.label.clone(), from + item.label.len()),
    };
    Transaction {
        change: TextChange { from, to, insert },
        selection: Some(selection),
        user_event: UserEvent::Complete,
    }
}
