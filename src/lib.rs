//! Editor integration for an external expression-language analyzer.
//!
//! The analyzer is reached only through [`gateway::Analyzer`]. Everything else
//! in this crate turns its answers into editor structures: a flat syntax
//! tree, highlight spans, debounced diagnostics, completions, hover
//! documentation and formatting transactions.

pub mod completion;
pub mod config;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod format;
pub mod gateway;
pub mod highlight;
pub mod hover;
pub mod syntax;

pub use editor::EditorSession;
pub use error::{BridgeError, BridgeResult};
pub use gateway::{Analyzer, AnalyzerSession};
