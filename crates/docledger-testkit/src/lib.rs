//! # DocLedger Testkit
//!
//! Testing utilities for DocLedger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known block hashes for cross-implementation verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Reproducible chains and memory-backed ledgers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use docledger_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hash) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use docledger_core::verify_chain;
//! use docledger_testkit::generators::chain;
//!
//! proptest! {
//!     #[test]
//!     fn appends_keep_chain_valid(chain in chain(16)) {
//!         prop_assert!(verify_chain(&chain).is_valid());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use docledger_testkit::fixtures::golden_chain;
//!
//! let chain = golden_chain();
//! assert_eq!(chain.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{golden_chain, tamper, TestFixture};
pub use generators::{chain_from_appends, AppendParams, Tamper};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
