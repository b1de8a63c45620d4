//! # DocLedger
//!
//! An append-only, tamper-evident ledger of document fingerprints.
//!
//! ## Overview
//!
//! Each block certifies that a document hash was presented at a given time.
//! Blocks are linked by SHA-256 hashes, so any later edit to a block's
//! content breaks either its own hash or the link from its successor.
//!
//! - **Append**: certify a fingerprint with optional metadata
//! - **Verify**: walk the chain and report every integrity fault
//! - **Lookup**: find the first block certifying a fingerprint
//! - **Reset**: discard history and start from a fresh genesis block
//!
//! The ledger proves *that* a fingerprint was presented and *when*, not who
//! presented it. Blocks are not signed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docledger::{Ledger, LedgerConfig, Metadata};
//! use docledger::store::FileStore;
//!
//! async fn example() {
//!     let ledger = Ledger::new(FileStore::open("chain.json"), LedgerConfig::default());
//!
//!     let block = ledger.append("docHashA", Metadata::new()).await.unwrap();
//!     assert_eq!(block.index, 1);
//!
//!     assert!(ledger.verify().await.unwrap().is_valid());
//!     assert!(ledger.find_by_doc_hash("docHashA").await.unwrap().is_some());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `docledger::core` - Chain primitives (Block, hashing, validation)
//! - `docledger::store` - Storage abstraction with file, SQLite and memory backends

pub mod config;
pub mod error;
pub mod ledger;
pub mod response;

// Re-export component crates
pub use docledger_core as core;
pub use docledger_store as store;

// Re-export main types for convenience
pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use response::{AppendResponse, ErrorResponse, LookupResponse, ResetResponse};

// Re-export commonly used core types
pub use docledger_core::{Block, BlockHash, Chain, ChainFault, Metadata, VerificationReport};
