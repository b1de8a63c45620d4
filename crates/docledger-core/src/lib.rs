//! # DocLedger Core
//!
//! Pure primitives for DocLedger: an append-only, hash-linked ledger of
//! document fingerprints.
//!
//! This crate contains no I/O, no storage, no clocks beyond
//! [`now_timestamp`]. It is pure computation over the chain data structure.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable ledger entry certifying a document fingerprint
//! - [`Chain`] - The non-empty ordered sequence of blocks, genesis first
//! - [`BlockHash`] - SHA-256 digest linking a block to its predecessor
//! - [`VerificationReport`] - Structured result of walking a chain
//!
//! ## Hashing
//!
//! Block hashes are SHA-256 over `index|timestamp|docHash|prevHash`, rendered
//! as lowercase hex. See [`hash`] module.

pub mod block;
pub mod builder;
pub mod error;
pub mod hash;
pub mod lookup;
pub mod validation;

pub use block::{
    metadata_from_value, Block, Chain, Metadata, GENESIS_DOC_HASH, GENESIS_NOTE,
    SCALAR_METADATA_KEY,
};
pub use builder::{genesis, next_block, now_timestamp};
pub use error::{CoreError, Result};
pub use hash::{compute_block_hash, BlockHash, HASH_HEX_LENGTH};
pub use lookup::find_by_doc_hash;
pub use validation::{verify_chain, verify_chain_strict, ChainFault, VerificationReport};
