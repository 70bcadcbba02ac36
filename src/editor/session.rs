//! One document's editing session.
//!
//! Wires the providers together over a shared [`AnalyzerSession`]. The
//! syntax tree is rebuilt from scratch on every text change and diagnostics
//! are rescheduled; nothing from the previous tree is reused.

use std::sync::Arc;

use super::document::{Document, EditorHost, Transaction};
use crate::completion::{CompletionEngine, CompletionList, FunctionRegistry, apply_completion};
use crate::config::Settings;
use crate::diagnostics::DiagnosticsEngine;
use crate::format::{FormatAction, FormatOutcome};
use crate::gateway::AnalyzerSession;
use crate::highlight::{HighlightSpan, Scope, TokenClassifier, highlight_tree};
use crate::hover::{HoverInfo, hover};
use crate::syntax::{Bias, SyntaxTree, parse_document};

#[derive(Debug)]
pub struct EditorSession {
    analyzer: Arc<AnalyzerSession>,
    registry: Arc<FunctionRegistry>,
    document: Document,
    tree: SyntaxTree,
    classifier: TokenClassifier,
    diagnostics: DiagnosticsEngine,
    completion: CompletionEngine,
    format: FormatAction,
}

impl EditorSession {
    pub fn new(analyzer: Arc<AnalyzerSession>, registry: Arc<FunctionRegistry>) -> Self {
        Self::with_settings(analyzer, registry, &Settings::default())
    }

    pub fn with_settings(
        analyzer: Arc<AnalyzerSession>,
        registry: Arc<FunctionRegistry>,
        settings: &Settings,
    ) -> Self {
        Self {
            classifier: TokenClassifier::new(Arc::clone(&analyzer)),
            diagnostics: DiagnosticsEngine::with_delay(
                Arc::clone(&analyzer),
                settings.debounce_delay(),
            ),
            completion: CompletionEngine::new(Arc::clone(&registry))
                .with_keywords(settings.include_keywords()),
            format: FormatAction::new(settings.format.clone()),
            document: Document::default(),
            tree: SyntaxTree::empty(),
            analyzer,
            registry,
        }
    }

    /// Replace the whole document.
    pub fn open(&mut self, text: impl Into<String>) {
        self.document = Document::new(text);
        self.text_changed();
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.document.set_cursor(cursor);
    }

    /// Apply an edit from the host.
    pub fn apply(&mut self, transaction: Transaction) {
        self.document.dispatch(transaction);
        self.text_changed();
    }

    fn text_changed(&mut self) {
        self.tree = parse_document(&self.analyzer, self.document.text());
        self.diagnostics.on_change(self.document.text());
    }

    /// The current syntax tree.
    pub fn syntax_tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Structural highlighting from the current tree.
    pub fn highlight(&self) -> Vec<HighlightSpan> {
        highlight_tree(&self.tree)
    }

    /// Stream highlighting, one tokenization per changed line.
    pub fn highlight_lines(&mut self) -> Vec<HighlightSpan> {
        self.classifier.highlight_document(self.document.text())
    }

    /// Stream highlighting with one tokenization for the whole document.
    pub fn highlight_document(&mut self) -> Vec<HighlightSpan> {
        self.classifier
            .classify(Scope::Document, self.document.text())
            .to_vec()
    }

    pub fn diagnostics(&self) -> &DiagnosticsEngine {
        &self.diagnostics
    }

    pub fn complete(&self, explicit: bool) -> Option<CompletionList> {
        self.completion
            .complete(self.document.text(), self.document.cursor(), explicit)
    }

    /// Apply the `index`th item of `list`. Returns false if there is none.
    pub fn accept_completion(&mut self, list: &CompletionList, index: usize) -> bool {
        let Some(item) = list.items.get(index) else {
            return false;
        };
        self.apply(apply_completion(item, list.from, list.to));
        true
    }

    pub fn hover(&self, pos: usize) -> Option<HoverInfo> {
        self.hover_with_bias(pos, Bias::After)
    }

    pub fn hover_with_bias(&self, pos: usize, bias: Bias) -> Option<HoverInfo> {
        hover(&self.tree, self.document.text(), &self.registry, pos, bias)
    }

    /// Run the formatter. Formatting never fails; errors become `Unchanged`.
    pub fn format(&mut self) -> FormatOutcome {
        let outcome = self.format.run(&self.analyzer, &mut self.document);
        if outcome != FormatOutcome::Unchanged {
            self.text_changed();
        }
        outcome
    }
}
