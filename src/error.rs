//! Error handling types for exprbridge
//!
//! Gateway failures, malformed engine payloads and configuration problems all
//! surface as [`BridgeError`]. Providers swallow these at their boundary and
//! fall back to empty results, so callers in the editor loop never see them.

use std::sync::PoisonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The analysis engine could not be initialized for this session
    #[error("Analyzer unavailable: {message}")]
    Unavailable { message: String },

    /// The engine's shared library failed to load
    #[error("Failed to load analyzer library: {0}")]
    Library(#[from] libloading::Error),

    /// A required export is missing from the engine library
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    /// The engine does not provide this operation
    #[error("Analyzer does not support {operation}")]
    Unsupported { operation: &'static str },

    /// The engine returned a null pointer where a result was expected
    #[error("Analyzer returned no result for {operation}")]
    NullResult { operation: &'static str },

    /// A JSON payload from the engine could not be decoded
    #[error("Malformed analyzer payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The engine reported a failure for a call
    #[error("Analyzer call failed: {message}")]
    Engine { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gateway and provider operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Helper trait to convert PoisonError into a recovered guard
pub trait LockResultExt<T> {
    /// Recover the guard from a poisoned lock, logging which operation hit it.
    fn recover_poison(self, context: &str) -> Result<T, BridgeError>;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> Result<T, BridgeError> {
        match self {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                log::warn!(
                    target: "exprbridge::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                Ok(poisoned.into_inner())
            }
        }
    }
}

impl BridgeError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        BridgeError::Unavailable {
            message: message.into(),
        }
    }

    pub fn symbol_not_found(symbol: impl Into<String>) -> Self {
        BridgeError::SymbolNotFound {
            symbol: symbol.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        BridgeError::Engine {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Config {
            message: message.into(),
        }
    }
}
