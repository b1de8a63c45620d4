//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Chains built here use fixed
//! timestamps, so their hashes are reproducible.

use std::sync::Arc;

use docledger::{Ledger, LedgerConfig};
use docledger_core::{genesis, next_block, Block, Chain, Metadata};
use docledger_store::{ChainStore, MemoryStore};

/// Timestamp of the genesis block in fixture chains.
pub const GENESIS_TIMESTAMP: &str = "2024-01-15T10:30:00.000Z";

/// A `chain.json` as written by earlier DocLedger deployments (two-space
/// indentation): genesis, `docHashA` with `{"note":"doc1"}`, then `docHashB`
/// with no metadata.
pub const LEGACY_CHAIN_JSON: &str = r#"[
  {
    "index": 0,
    "timestamp": "2024-01-15T10:30:00.000Z",
    "docHash": "GENESIS",
    "metadata": {
      "note": "Genesis"
    },
    "prevHash": "0000000000000000000000000000000000000000000000000000000000000000",
    "hash": "933071310fd184c2d962d366c960478848fd78c8ef0335e3a6261fe8b7598873"
  },
  {
    "index": 1,
    "timestamp": "2024-01-15T10:31:00.000Z",
    "docHash": "docHashA",
    "metadata": {
      "note": "doc1"
    },
    "prevHash": "933071310fd184c2d962d366c960478848fd78c8ef0335e3a6261fe8b7598873",
    "hash": "5d5f652560cf5097ef91ff3f00015d5af47148867a07431356422c98d2abb522"
  },
  {
    "index": 2,
    "timestamp": "2024-01-15T10:32:00.000Z",
    "docHash": "docHashB",
    "metadata": {},
    "prevHash": "5d5f652560cf5097ef91ff3f00015d5af47148867a07431356422c98d2abb522",
    "hash": "c9fee8d008be7c2d952f131729f4f3c895ed0333afa0212d609f5248d1bc4c5c"
  }
]"#;

/// Timestamp `minutes` after [`GENESIS_TIMESTAMP`]. Wraps within the day.
pub fn fixed_timestamp(minutes: u64) -> String {
    let total = 10 * 60 + 30 + minutes;
    format!(
        "2024-01-15T{:02}:{:02}:00.000Z",
        (total / 60) % 24,
        total % 60
    )
}

/// Metadata with a single `note` entry.
pub fn note(text: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("note".into(), serde_json::Value::String(text.into()));
    metadata
}

/// A genesis-only chain at [`GENESIS_TIMESTAMP`].
pub fn genesis_chain() -> Chain {
    Chain::new(genesis(GENESIS_TIMESTAMP.into()))
}

/// A chain certifying `docs` in order, one minute apart.
///
/// Panics if any entry is empty.
pub fn chain_with_docs(docs: &[&str]) -> Chain {
    let mut chain = genesis_chain();
    for doc in docs {
        let block = next_block(
            chain.tip(),
            doc,
            Metadata::new(),
            fixed_timestamp(chain.len() as u64),
        )
        .expect("fixture doc hashes must be non-empty");
        chain.push(block);
    }
    chain
}

/// The chain described by [`LEGACY_CHAIN_JSON`], built in code.
pub fn golden_chain() -> Chain {
    let mut chain = genesis_chain();
    for (doc, metadata) in [("docHashA", note("doc1")), ("docHashB", Metadata::new())] {
        let block = next_block(chain.tip(), doc, metadata, fixed_timestamp(chain.len() as u64))
            .expect("fixture doc hashes must be non-empty");
        chain.push(block);
    }
    chain
}

/// Copy of `chain` with the block at `position` edited by `f`.
///
/// Bypasses [`Chain`]'s append-only surface to simulate tampering at rest.
pub fn tamper(chain: &Chain, position: usize, f: impl FnOnce(&mut Block)) -> Chain {
    let mut blocks = chain.clone().into_blocks();
    f(&mut blocks[position]);
    Chain::from_blocks(blocks).expect("tampering keeps the chain non-empty")
}

/// A test fixture with a shared memory store.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
}

impl TestFixture {
    /// Create a new test fixture with an empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Create with the store already holding `raw` bytes.
    pub fn with_raw(raw: impl Into<Vec<u8>>) -> Self {
        Self {
            store: Arc::new(MemoryStore::with_raw(raw)),
        }
    }

    /// Create with the store already holding `chain`.
    pub async fn with_chain(chain: &Chain) -> Self {
        let fixture = Self::new();
        fixture
            .store
            .save(chain)
            .await
            .expect("memory store save cannot fail");
        fixture
    }

    /// A ledger over the fixture's store with default configuration.
    pub fn ledger(&self) -> Ledger<MemoryStore> {
        self.ledger_with(LedgerConfig::default())
    }

    /// A ledger over the fixture's store.
    pub fn ledger_with(&self, config: LedgerConfig) -> Ledger<MemoryStore> {
        Ledger::with_shared_store(self.store.clone(), config)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::{BLOCK1_HASH, BLOCK2_HASH, GENESIS_HASH};
    use docledger_core::verify_chain;

    #[test]
    fn test_golden_chain_matches_vectors() {
        let chain = golden_chain();
        let hashes: Vec<&str> = chain.iter().map(|b| b.hash.as_str()).collect();
        assert_eq!(hashes, vec![GENESIS_HASH, BLOCK1_HASH, BLOCK2_HASH]);
    }

    #[test]
    fn test_legacy_layout_parses_to_golden_chain() {
        let parsed: Chain = serde_json::from_str(LEGACY_CHAIN_JSON).unwrap();
        assert_eq!(parsed, golden_chain());
    }

    #[test]
    fn test_chain_with_docs_is_valid() {
        let chain = chain_with_docs(&["a", "b", "c"]);
        assert_eq!(chain.len(), 4);
        assert!(verify_chain(&chain).is_valid());
    }

    #[tokio::test]
    async fn test_fixture_ledger_sees_seeded_chain() {
        let fixture = TestFixture::with_chain(&golden_chain()).await;
        let chain = fixture.ledger().chain().await.unwrap();
        assert_eq!(chain, golden_chain());
    }
}
