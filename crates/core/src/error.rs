//! Core error types
//!
//! Every failure the companion can meet is recovered locally. Callers
//! convert their own errors into [`CoreError`] to log them and to decide
//! whether a built-in fallback covers the failure.

use thiserror::Error;

/// Core error type for SafeSpace
#[derive(Debug, Error)]
pub enum CoreError {
    /// Profile data could not be fetched; the fallback profile applies
    #[error("Profile data unavailable: {0}")]
    DataUnavailable(String),

    /// Stored settings could not be parsed; defaults apply
    #[error("Stored settings are corrupt: {0}")]
    SettingsCorrupt(String),

    /// The settings store refused a write
    #[error("Settings store rejected the write")]
    StoreRejected,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the failure is expected and covered by a built-in fallback.
    /// Anything else points at the host environment (disk, permissions).
    pub fn has_fallback(&self) -> bool {
        matches!(
            self,
            CoreError::DataUnavailable(_) | CoreError::SettingsCorrupt(_)
        )
    }
}
