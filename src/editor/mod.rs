//! The editor-facing surface: document model and the per-document session.

mod document;
mod session;

pub use document::{Document, EditorHost, TextChange, Transaction, UserEvent};
pub use session::EditorSession;
