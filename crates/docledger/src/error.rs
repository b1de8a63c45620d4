//! Error types for the Ledger.

use docledger_core::CoreError;
use docledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request was rejected before anything was read or written.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Storage error. The operation failed; the persisted chain is unchanged.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Chain construction error.
    #[error("chain error: {0}")]
    Core(#[from] CoreError),
}

impl LedgerError {
    /// Whether the caller is at fault (maps to a client error status).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidInput(_) | LedgerError::Core(CoreError::InvalidInput(_))
        )
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
