//! Error types for the store module.

use docledger_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Unreadable persisted data is not an error here; it is reported as
/// [`LoadOutcome::Corrupt`](crate::LoadOutcome::Corrupt) and recovered.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Chain serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Core error while building a chain.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A blocking storage task failed to complete.
    #[error("storage task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        StoreError::Task(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
