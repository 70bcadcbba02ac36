//! Lazily initialized, shared handle to the analysis engine.
//!
//! The engine is loaded at most once per session. Concurrent first callers
//! block on the same initialization and observe its single result; a failed
//! initialization is remembered and every later caller sees the session as
//! unavailable.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use super::{Analyzer, LibraryAnalyzer};
use crate::error::{BridgeError, BridgeResult};

pub type SharedAnalyzer = Arc<dyn Analyzer>;

type Initializer = Box<dyn Fn() -> BridgeResult<SharedAnalyzer> + Send + Sync>;

const LOG_TARGET: &str = "exprbridge::gateway";

pub struct AnalyzerSession {
    initializer: Initializer,
    engine: OnceLock<Result<SharedAnalyzer, String>>,
}

impl fmt::Debug for AnalyzerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.engine.get() {
            None => "uninitialized",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "unavailable",
        };
        f.debug_struct("AnalyzerSession")
            .field("state", &state)
            .finish()
    }
}

impl AnalyzerSession {
    /// Create a session that runs `initializer` on first use.
    pub fn new<F>(initializer: F) -> Self
    where
        F: Fn() -> BridgeResult<SharedAnalyzer> + Send + Sync + 'static,
    {
        Self {
            initializer: Box::new(initializer),
            engine: OnceLock::new(),
        }
    }

    /// Create a session that loads the engine library at `path` on first use.
    /// Without a path the session is unavailable.
    pub fn from_library(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::new(move || {
                log::debug!(target: LOG_TARGET, "Loading analyzer from {}", path.display());
                Ok(Arc::new(LibraryAnalyzer::load(&path)?) as SharedAnalyzer)
            }),
            None => Self::unavailable("no analyzer library configured"),
        }
    }

    /// Create a session around an already constructed engine.
    pub fn with_analyzer(analyzer: SharedAnalyzer) -> Self {
        let session = Self::new(|| Err(BridgeError::unavailable("session was pre-initialized")));
        let _ = session.engine.set(Ok(analyzer));
        session
    }

    /// Create a session whose engine is known to be missing.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let session = Self::new(|| Err(BridgeError::unavailable("no analyzer configured")));
        let _ = session.engine.set(Err(reason.into()));
        session
    }

    /// The engine, initializing it on first call.
    pub fn analyzer(&self) -> BridgeResult<&SharedAnalyzer> {
        let state = self.engine.get_or_init(|| match (self.initializer)() {
            Ok(analyzer) => {
                log::info!(target: LOG_TARGET, "Analyzer initialized");
                Ok(analyzer)
            }
            Err(err) => {
                log::error!(target: LOG_TARGET, "Analyzer failed to initialize: {}", err);
                Err(err.to_string())
            }
        });

        state
            .as_ref()
            .map_err(|reason| BridgeError::unavailable(reason.clone()))
    }

    /// Whether initialization has already run (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::CannedAnalyzer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_initializes_lazily_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let session = AnalyzerSession::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(CannedAnalyzer::new()) as SharedAnalyzer)
        });

        assert!(!session.is_initialized());
        assert!(session.analyzer().is_ok());
        assert!(session.analyzer().is_ok());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_callers_share_one_initialization() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let session = Arc::new(AnalyzerSession::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(std::time::Duration::from_millis(20));
            Ok(Arc::new(CannedAnalyzer::new()) as SharedAnalyzer)
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                thread::spawn(move || session.analyzer().map(Arc::clone).ok())
            })
            .collect();
        let engines: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(engines.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn test_failed_initialization_is_remembered() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let session = AnalyzerSession::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(BridgeError::unavailable("library missing"))
        });

        let err = session.analyzer().err().unwrap();
        assert!(err.to_string().contains("library missing"));
        assert!(session.analyzer().is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_library_is_unavailable_not_fatal() {
        let session = AnalyzerSession::from_library(Some(PathBuf::from(
            "/nonexistent/libexprbridge_analyzer.so",
        )));
        assert!(!session.is_initialized());
        assert!(matches!(
            session.analyzer(),
            Err(BridgeError::Unavailable { .. })
        ));
        assert!(AnalyzerSession::from_library(None).analyzer().is_err());
    }

    #[test]
    fn test_unavailable_session() {
        let session = AnalyzerSession::unavailable("no engine");
        assert!(session.is_initialized());
        assert!(matches!(
            session.analyzer(),
            Err(BridgeError::Unavailable { .. })
        ));
    }
}
