//! Host-side document model: text replacements and the transactions that
//! carry them.

use serde::Serialize;

/// Why a transaction was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserEvent {
    Input,
    Complete,
    Format,
}

/// Replace `[from, to)` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChange {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub change: TextChange,
    /// Cursor position after the change; `None` maps the old cursor.
    pub selection: Option<usize>,
    pub user_event: UserEvent,
}

/// What the editor shell provides to the providers.
pub trait EditorHost {
    fn text(&self) -> &str;

    fn dispatch(&mut self, transaction: Transaction);
}

/// In-memory document implementing [`EditorHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    cursor: usize,
    last_event: Option<UserEvent>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self {
            text,
            cursor,
            last_event: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = floor_char_boundary(&self.text, cursor);
    }

    pub fn last_event(&self) -> Option<UserEvent> {
        self.last_event
    }

    fn apply(&mut self, change: &TextChange) {
        let to = floor_char_boundary(&self.text, change.to);
        let from = floor_char_boundary(&self.text, change.from.min(to));
        self.text.replace_range(from..to, &change.insert);

        let inserted = change.insert.len();
        if self.cursor >= to {
            self.cursor = self.cursor - (to - from) + inserted;
        } else if self.cursor > from {
            self.cursor = from + inserted;
        }
    }
}

impl EditorHost for Document {
    fn text(&self) -> &str {
        &self.text
    }

    fn dispatch(&mut self, transaction: Transaction) {
        let before = self.cursor;
        self.apply(&transaction.change);
        match transaction.selection {
            Some(selection) => self.set_cursor(selection),
            // A reformat replaces the whole text; stay near the old offset
            // instead of jumping to the end.
            None if transaction.user_event == UserEvent::Format => self.set_cursor(before),
            None => {}
        }
        self.last_event = Some(transaction.user_event);
    }
}

fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(from: usize, to: usize, text: &str, event: UserEvent) -> Transaction {
        Transaction {
            change: TextChange {
                from,
                to,
                insert: text.to_string(),
            },
            selection: None,
            user_event: event,
        }
    }

    #[test]
    fn test_dispatch_replaces_range_and_maps_cursor() {
        let mut doc = Document::new("1 + 2");
        doc.dispatch(insert(4, 5, "42", UserEvent::Input));
        assert_eq!(doc.text(), "1 + 42");
        assert_eq!(doc.cursor(), 6);
        assert_eq!(doc.last_event(), Some(UserEvent::Input));
    }

    #[test]
    fn test_format_keeps_cursor_offset() {
        let mut doc = Document::new("IF([a]>1,'big','small')");
        doc.set_cursor(9);
        let len = doc.text().len();
        doc.dispatch(insert(0, len, "IF([a] > 1, 'big', 'small')", UserEvent::Format));
        assert_eq!(doc.cursor(), 9);

        doc.dispatch(insert(0, doc.text().len(), "1", UserEvent::Format));
        assert_eq!(doc.cursor(), 1, "clamped to the shorter text");

        let mut doc = Document::new("1+2");
        doc.set_cursor(1);
        doc.dispatch(insert(0, 3, "1 + 2", UserEvent::Input));
        assert_eq!(doc.cursor(), 5, "other whole-text edits still map to the end");
    }

    #[test]
    fn test_explicit_selection_wins() {
        let mut doc = Document::new("MA");
        let mut tx = insert(0, 2, "MAX()", UserEvent::Complete);
        tx.selection = Some(4);
        doc.dispatch(tx);
        assert_eq!(doc.text(), "MAX()");
        assert_eq!(doc.cursor(), 4);
    }

    #[test]
    fn test_out_of_range_change_is_clamped() {
        let mut doc = Document::new("ab");
        doc.dispatch(insert(5, 9, "c", UserEvent::Input));
        assert_eq!(doc.text(), "abc");
    }
}
