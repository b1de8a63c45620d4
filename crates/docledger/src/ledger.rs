//! The Ledger: the public API over a chain store.
//!
//! The Ledger owns one store and serializes every mutation through a writer
//! lock, so concurrent appends through the same Ledger never lose an update.
//! Reads take the lock only when the store has no chain yet.

use std::sync::Arc;

use docledger_core::{
    find_by_doc_hash, next_block, now_timestamp, verify_chain, verify_chain_strict, Block, Chain,
    Metadata, VerificationReport,
};
use docledger_store::{ChainStore, ChainStoreExt, LoadOutcome};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

/// The main Ledger struct.
///
/// Provides:
/// - Appending document fingerprints
/// - Reading the whole chain
/// - Verifying chain integrity
/// - Looking up a fingerprint
/// - Resetting to a fresh genesis
///
/// Separate Ledger instances over the same backing data are not coordinated.
pub struct Ledger<S: ChainStore> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: LedgerConfig,
    /// Held across every load-modify-save.
    write_lock: Mutex<()>,
}

impl<S: ChainStore> Ledger<S> {
    /// Create a new ledger over `store`.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a new ledger over a store shared with other owners.
    pub fn with_shared_store(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Certify `doc_hash` by appending a new block at the tip.
    ///
    /// An empty `doc_hash` is rejected before storage is touched. Pass
    /// `Metadata::new()` when there is nothing to annotate.
    pub async fn append(&self, doc_hash: &str, metadata: Metadata) -> Result<Block> {
        if doc_hash.is_empty() {
            return Err(LedgerError::InvalidInput("docHash required".into()));
        }

        let _guard = self.write_lock.lock().await;

        let mut chain = self.store.load().await?;
        if self.config.verify_before_append {
            let report = self.check(&chain);
            if !report.is_valid() {
                warn!(
                    errors = ?report.errors(),
                    "appending to a chain that fails verification"
                );
            }
        }

        let block = next_block(chain.tip(), doc_hash, metadata, now_timestamp())?;
        chain.push(block.clone());
        self.store.save(&chain).await?;

        info!(index = block.index, doc_hash, hash = %block.hash, "appended block");
        Ok(block)
    }

    /// Discard all history and start over from a fresh genesis block.
    pub async fn reset(&self) -> Result<Chain> {
        let _guard = self.write_lock.lock().await;
        let chain = self.store.reset().await?;
        info!(hash = %chain.genesis().hash, "ledger reset");
        Ok(chain)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The whole chain, genesis first.
    ///
    /// Creates the genesis block if nothing is persisted yet.
    pub async fn chain(&self) -> Result<Chain> {
        self.snapshot().await
    }

    /// Walk the chain and report every integrity fault.
    pub async fn verify(&self) -> Result<VerificationReport> {
        let chain = self.snapshot().await?;
        let report = self.check(&chain);
        if !report.is_valid() {
            warn!(
                faults = report.faults.len(),
                errors = ?report.errors(),
                "chain failed verification"
            );
        }
        Ok(report)
    }

    /// The first block certifying `doc_hash`, if any.
    pub async fn find_by_doc_hash(&self, doc_hash: &str) -> Result<Option<Block>> {
        if doc_hash.is_empty() {
            return Err(LedgerError::InvalidInput("docHash required".into()));
        }

        let chain = self.snapshot().await?;
        Ok(find_by_doc_hash(&chain, doc_hash)?.cloned())
    }

    /// The last fully saved chain.
    ///
    /// Initialization and recovery write, so they happen under the writer
    /// lock; `load` re-reads before writing, so a concurrent writer's chain
    /// is never replaced.
    async fn snapshot(&self) -> Result<Chain> {
        if let LoadOutcome::Loaded(chain) = self.store.try_load().await? {
            return Ok(chain);
        }

        let _guard = self.write_lock.lock().await;
        Ok(self.store.load().await?)
    }

    fn check(&self, chain: &Chain) -> VerificationReport {
        if self.config.strict_verification {
            verify_chain_strict(chain)
        } else {
            verify_chain(chain)
        }
    }
}
