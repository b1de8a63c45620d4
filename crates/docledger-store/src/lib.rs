//! # DocLedger Store
//!
//! Chain persistence for DocLedger. Provides a trait-based interface with
//! JSON file, SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store abstracts "the current chain" behind the [`ChainStore`] trait,
//! so the ledger never assumes a storage technology. [`FileStore`] is the
//! default backend and reads and writes the classic `chain.json` layout;
//! [`SqliteStore`] keeps one row per block; [`MemoryStore`] is for tests.
//!
//! ## Key Types
//!
//! - [`ChainStore`] - The async trait with the four primitive operations
//! - [`ChainStoreExt`] - `load` / `reset` with lazy genesis and recovery
//! - [`LoadOutcome`] - Side-effect free view of what is persisted
//! - [`LoadOrigin`] - Whether a loaded chain was read, created or recovered
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docledger_store::{ChainStoreExt, FileStore};
//!
//! async fn example() {
//!     let store = FileStore::open("chain.json");
//!
//!     // Creates and persists a genesis chain on first use.
//!     let chain = store.load().await.unwrap();
//!     assert!(chain.genesis().is_genesis());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Lazy genesis**: `load` writes when nothing is persisted yet.
//!   `try_load` never writes.
//! - **Quarantine, never delete**: unreadable data is renamed aside under a
//!   timestamp-qualified name and a fresh genesis chain takes its place.
//! - **Atomic saves**: temp file + rename, or one SQLite transaction.

pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::{FileStore, CHAIN_FILE_ENV, DEFAULT_CHAIN_FILE};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ChainStore, ChainStoreExt, LoadOrigin, LoadOutcome};
