//! Stream classification from the engine's token list.
//!
//! Each scope (a single line, or the whole document) keeps the tokenization
//! of the text it last saw. The cache for a scope is replaced wholesale as
//! soon as its text differs; nothing is patched incrementally.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::style::{StyleCategory, token_style};
use crate::gateway::{AnalyzerSession, Token};

const LOG_TARGET: &str = "exprbridge::highlight";

/// A styled byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub style: StyleCategory,
}

/// The unit a tokenization is cached for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Line(usize),
    Document,
}

#[derive(Debug, Default)]
struct ScopeCache {
    text: String,
    tokens: Vec<Token>,
    error_ranges: Vec<(usize, usize)>,
    spans: Vec<HighlightSpan>,
}

#[derive(Debug)]
pub struct TokenClassifier {
    session: Arc<AnalyzerSession>,
    cache: HashMap<Scope, ScopeCache>,
}

impl TokenClassifier {
    pub fn new(session: Arc<AnalyzerSession>) -> Self {
        Self {
            session,
            cache: HashMap::new(),
        }
    }

    /// Styled spans for `text`, relative to the start of `text`.
    pub fn classify(&mut self, scope: Scope, text: &str) -> &[HighlightSpan] {
        let stale = self
            .cache
            .get(&scope)
            .is_none_or(|cached| cached.text != text);
        if stale {
            let fresh = self.fill(text);
            self.cache.insert(scope, fresh);
        }
        self.cache
            .get(&scope)
            .map(|cached| cached.spans.as_slice())
            .unwrap_or(&[])
    }

    /// Tokens cached for `scope`, if any.
    pub fn cached_tokens(&self, scope: Scope) -> Option<&[Token]> {
        self.cache.get(&scope).map(|cached| cached.tokens.as_slice())
    }

    /// Error ranges reported by the last tokenization of `scope`.
    pub fn cached_error_ranges(&self, scope: Scope) -> Option<&[(usize, usize)]> {
        self.cache
            .get(&scope)
            .map(|cached| cached.error_ranges.as_slice())
    }

    /// Classify the document line by line; offsets are absolute.
    pub fn highlight_document(&mut self, text: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        let mut line_start = 0;
        let mut line_count = 0;
        for (index, raw) in text.split('\n').enumerate() {
            line_count = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            spans.extend(
                self.classify(Scope::Line(index), line)
                    .iter()
                    .map(|span| HighlightSpan {
                        start: span.start + line_start,
                        end: span.end + line_start,
                        style: span.style,
                    }),
            );
            line_start += raw.len() + 1;
        }
        self.cache.retain(|scope, _| match scope {
            Scope::Line(index) => *index < line_count,
            Scope::Document => true,
        });
        spans
    }

    /// Drop every cached tokenization.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn fill(&self, text: &str) -> ScopeCache {
        if text.trim().is_empty() {
            return ScopeCache {
                text: text.to_string(),
                ..ScopeCache::default()
            };
        }

        let result = self
            .session
            .analyzer()
            .and_then(|analyzer| analyzer.tokenize(text));
        let (tokens, error_ranges) = match result {
            Ok(result) => {
                let mut tokens = result.tokens;
                let mut errors: Vec<_> = result
                    .errors
                    .iter()
                    .map(|err| err.clamped_span(text.len()))
                    .filter(|(start, end)| start < end)
                    .collect();
                // scan() walks both lists with forward cursors
                tokens.sort_by_key(|token| token.start);
                errors.sort_unstable();
                (tokens, errors)
            }
            Err(err) => {
                log::warn!(target: LOG_TARGET, "Tokenize failed: {}", err);
                (Vec::new(), Vec::new())
            }
        };

        let spans = scan(text, &tokens, &error_ranges);
        log::trace!(
            target: LOG_TARGET,
            "Tokenized {} bytes into {} tokens, {} spans",
            text.len(),
            tokens.len(),
            spans.len()
        );
        ScopeCache {
            text: text.to_string(),
            tokens,
            error_ranges,
            spans,
        }
    }
}

fn char_len_at(text: &str, pos: usize) -> usize {
    text.get(pos..)
        .and_then(|rest| rest.chars().next())
        .map_or(1, char::len_utf8)
}

/// Walk `text` left to right, assigning styles.
///
/// Positions inside an error range are marked invalid one character at a
/// time, since error ranges need not line up with token boundaries.
///
/// `tokens` and `error_ranges` must be sorted by start offset.
fn scan(text: &str, tokens: &[Token], error_ranges: &[(usize, usize)]) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut pos = 0;
    let mut next_token = 0;
    let mut next_error = 0;
    while pos < text.len() {
        let step = char_len_at(text, pos);
        let Some(rest) = text.get(pos..) else {
            pos += 1;
            continue;
        };
        if rest.starts_with(char::is_whitespace) {
            pos += step;
            continue;
        }

        while error_ranges
            .get(next_error)
            .is_some_and(|&(_, end)| end <= pos)
        {
            next_error += 1;
        }
        if error_ranges
            .get(next_error)
            .is_some_and(|&(start, _)| start <= pos)
        {
            spans.push(HighlightSpan {
                start: pos,
                end: pos + step,
                style: StyleCategory::Invalid,
            });
            pos += step;
            continue;
        }

        while tokens.get(next_token).is_some_and(|token| token.start < pos) {
            next_token += 1;
        }
        let token = tokens[next_token..]
            .iter()
            .take_while(|token| token.start == pos)
            .find(|token| token.end > pos);
        match token {
            Some(token) => {
                let end = token.end.min(text.len());
                if let Some(style) = token_style(token.kind) {
                    spans.push(HighlightSpan {
                        start: pos,
                        end,
                        style,
                    });
                }
                pos = end;
            }
            None => pos += step,
        }
    }
    spans
}

/// The style covering `pos`, if any.
pub fn style_at(spans: &[HighlightSpan], pos: usize) -> Option<StyleCategory> {
    spans
        .iter()
        .find(|span| span.start <= pos && pos < span.end)
        .map(|span| span.style)
}
