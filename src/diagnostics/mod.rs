//! Lint diagnostics: conversion from engine errors and debounced delivery.

mod convert;
mod debounce;

pub use convert::{Diagnostic, RenderedMessage, Severity, lint_document};
pub use debounce::{DEFAULT_DEBOUNCE_DURATION, DiagnosticSet, DiagnosticsEngine, PendingEvaluation};
