//! Error types for DocLedger Core.

use thiserror::Error;

/// Core errors that can occur while building or querying a chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required caller-supplied field was missing or empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tip already has the largest representable index.
    #[error("block index overflow: no successor for index {0}")]
    IndexOverflow(u64),

    /// A chain must contain at least the genesis block.
    #[error("chain must contain at least the genesis block")]
    EmptyChain,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
