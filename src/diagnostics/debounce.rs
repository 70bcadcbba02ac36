//! Debounced lint evaluation.
//!
//! Every document change bumps a generation counter and hands out a
//! [`PendingEvaluation`] stamped with it. Only an evaluation whose generation
//! is still the latest may publish; anything older is dropped on arrival.
//!
//! ```text
//! on_change(text)
//!       │
//!       ├─► generation += 1, abort previous timer
//!       │
//!       └─► spawn timer ─► sleep(delay) ─► lint on blocking pool
//!                                              │
//!                                              └─► publish if still current
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::convert::{Diagnostic, lint_document};
use crate::error::LockResultExt;
use crate::gateway::AnalyzerSession;

pub const DEFAULT_DEBOUNCE_DURATION: Duration = Duration::from_millis(500);

const LOG_TARGET: &str = "exprbridge::diagnostics";

/// The diagnostics for one document generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSet {
    pub generation: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// A scheduled evaluation of one document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvaluation {
    generation: u64,
    text: String,
}

impl PendingEvaluation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug)]
struct Shared {
    generation: AtomicU64,
    sender: watch::Sender<DiagnosticSet>,
}

impl Shared {
    fn is_current(&self, pending: &PendingEvaluation) -> bool {
        self.generation.load(Ordering::SeqCst) == pending.generation
    }

    fn publish(&self, pending: &PendingEvaluation, diagnostics: Vec<Diagnostic>) -> bool {
        if !self.is_current(pending) {
            log::debug!(
                target: LOG_TARGET,
                "Discarding stale diagnostics for generation {}",
                pending.generation
            );
            return false;
        }
        self.sender.send_if_modified(|current| {
            if current.generation > pending.generation {
                return false;
            }
            *current = DiagnosticSet {
                generation: pending.generation,
                diagnostics,
            };
            true
        })
    }
}

#[derive(Debug)]
pub struct DiagnosticsEngine {
    session: Arc<AnalyzerSession>,
    delay: Duration,
    shared: Arc<Shared>,
    timer: Mutex<Option<AbortHandle>>,
}

impl DiagnosticsEngine {
    pub fn new(session: Arc<AnalyzerSession>) -> Self {
        Self::with_delay(session, DEFAULT_DEBOUNCE_DURATION)
    }

    pub fn with_delay(session: Arc<AnalyzerSession>, delay: Duration) -> Self {
        let (sender, _) = watch::channel(DiagnosticSet::default());
        Self {
            session,
            delay,
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                sender,
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Receiver that observes every published [`DiagnosticSet`].
    pub fn subscribe(&self) -> watch::Receiver<DiagnosticSet> {
        self.shared.sender.subscribe()
    }

    /// The most recently published set.
    pub fn current(&self) -> DiagnosticSet {
        self.shared.sender.borrow().clone()
    }

    /// Invalidate every earlier evaluation and return a token for `text`.
    pub fn schedule(&self, text: impl Into<String>) -> PendingEvaluation {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        PendingEvaluation {
            generation,
            text: text.into(),
        }
    }

    pub fn is_current(&self, pending: &PendingEvaluation) -> bool {
        self.shared.is_current(pending)
    }

    /// Run the lint for `pending` synchronously.
    pub fn evaluate(&self, pending: &PendingEvaluation) -> Vec<Diagnostic> {
        lint_document(&self.session, &pending.text)
    }

    /// Publish `diagnostics` if `pending` is still the latest evaluation.
    /// Returns whether anything was published.
    pub fn publish(&self, pending: &PendingEvaluation, diagnostics: Vec<Diagnostic>) -> bool {
        self.shared.publish(pending, diagnostics)
    }

    /// Restart the debounce window for a changed document.
    ///
    /// Outside a tokio runtime there is no timer to arm, so the evaluation
    /// runs immediately.
    pub fn on_change(&self, text: impl Into<String>) -> PendingEvaluation {
        let pending = self.schedule(text);
        self.abort_timer();

        if pending.text.trim().is_empty() {
            self.publish(&pending, Vec::new());
            return pending;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::trace!(target: LOG_TARGET, "No runtime, evaluating immediately");
            let diagnostics = self.evaluate(&pending);
            self.publish(&pending, diagnostics);
            return pending;
        };

        let shared = Arc::clone(&self.shared);
        let session = Arc::clone(&self.session);
        let delay = self.delay;
        let task_pending = pending.clone();
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !shared.is_current(&task_pending) {
                return;
            }
            log::debug!(
                target: LOG_TARGET,
                "Debounce elapsed, linting generation {}",
                task_pending.generation
            );

            let text = task_pending.text.clone();
            let linted =
                tokio::task::spawn_blocking(move || lint_document(&session, &text)).await;
            match linted {
                Ok(diagnostics) => {
                    shared.publish(&task_pending, diagnostics);
                }
                Err(err) => {
                    log::error!(target: LOG_TARGET, "Lint task failed: {}", err);
                }
            }
        });

        if let Ok(mut timer) = self.timer.lock().recover_poison("diagnostics timer") {
            *timer = Some(task.abort_handle());
        }
        pending
    }

    /// Cancel any armed timer. A lint already running is not interrupted;
    /// its result is discarded because the generation moves on.
    pub fn cancel(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_timer();
    }

    fn abort_timer(&self) {
        if let Ok(mut timer) = self.timer.lock().recover_poison("diagnostics timer")
            && let Some(previous) = timer.take()
        {
            previous.abort();
            log::trace!(target: LOG_TARGET, "Cancelled previous debounce timer");
        }
    }

    #[cfg(test)]
    fn has_active_timer(&self) -> bool {
        self.timer
            .lock()
            .map(|timer| timer.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for DiagnosticsEngine {
    fn drop(&mut self) {
        self.abort_timer();
    }
}
