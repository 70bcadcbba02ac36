//! Editing sessions driven inside a tokio runtime, where diagnostics are
//! debounced instead of evaluated on the spot.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use exprbridge::completion::FunctionRegistry;
use exprbridge::config::Settings;
use exprbridge::editor::{TextChange, Transaction, UserEvent};
use exprbridge::gateway::{CannedAnalyzer, Operation};
use exprbridge::EditorSession;
use helpers::{TRAILING_COMMA, fixture_analyzer, session_for};

fn typed(from: usize, insert: &str) -> Transaction {
    Transaction {
        change: TextChange {
            from,
            to: from,
            insert: insert.to_string(),
        },
        selection: None,
        user_event: UserEvent::Input,
    }
}

fn editor_with_delay(analyzer: Arc<CannedAnalyzer>, delay_ms: u64) -> EditorSession {
    let mut settings = Settings::default();
    settings.diagnostics.delay_ms = Some(delay_ms);
    EditorSession::with_settings(
        session_for(analyzer),
        Arc::new(FunctionRegistry::builtin()),
        &settings,
    )
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_lints_final_text_once() {
    let analyzer = Arc::new(fixture_analyzer());
    let mut session = editor_with_delay(analyzer.clone(), 100);
    let mut receiver = session.diagnostics().subscribe();

    session.open("M");
    for (offset, piece) in [(1, "AX"), (3, "("), (4, "1"), (5, ","), (6, ")")] {
        tokio::time::sleep(Duration::from_millis(40)).await;
        session.apply(typed(offset, piece));
    }
    assert_eq!(session.text(), TRAILING_COMMA);
    assert_eq!(analyzer.calls(Operation::Lint), 0);

    receiver.changed().await.unwrap();
    let published = receiver.borrow_and_update().clone();
    assert_eq!(published.diagnostics.len(), 1);
    assert_eq!(published.diagnostics[0].start, 6);
    assert_eq!(analyzer.calls(Operation::Lint), 1);

    // The tree followed every edit synchronously.
    assert_eq!(analyzer.calls(Operation::ParseTree), 6);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_document_publishes_immediately() {
    let analyzer = Arc::new(fixture_analyzer());
    let mut session = editor_with_delay(analyzer.clone(), 100);
    let mut receiver = session.diagnostics().subscribe();

    session.open(TRAILING_COMMA);
    receiver.changed().await.unwrap();
    assert_eq!(receiver.borrow_and_update().diagnostics.len(), 1);

    session.open("");
    assert!(receiver.has_changed().unwrap());
    assert!(receiver.borrow_and_update().diagnostics.is_empty());
    assert_eq!(analyzer.calls(Operation::Lint), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_cancels_pending_lint() {
    let analyzer = Arc::new(fixture_analyzer());
    let mut session = editor_with_delay(analyzer.clone(), 100);
    session.open(TRAILING_COMMA);
    drop(session);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(analyzer.calls(Operation::Lint), 0);
}
