//! Store trait: the abstract interface for chain persistence.
//!
//! Implementations provide four primitive operations. The lazy-genesis and
//! corruption-recovery policy lives once, in [`ChainStoreExt`], on top of
//! them.

use async_trait::async_trait;
use docledger_core::{genesis, now_timestamp, Chain};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Result of reading the persisted chain without side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing is persisted yet.
    Missing,
    /// A well-formed chain was read.
    Loaded(Chain),
    /// Persisted data exists but does not parse as a chain.
    Corrupt {
        /// Why parsing failed.
        reason: String,
    },
}

/// Where the chain returned by [`ChainStoreExt::load_with_origin`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Read from existing persisted data.
    Existing,
    /// Nothing was persisted; a genesis chain was created and saved.
    Initialized,
    /// Persisted data was unreadable; it was quarantined and a genesis chain
    /// was created and saved in its place.
    Recovered {
        /// The name the unreadable data was moved to.
        quarantined_as: String,
        /// Why parsing failed.
        reason: String,
    },
}

/// The ChainStore trait: async interface for chain persistence.
///
/// A store owns exactly one chain. Blocking backends run their I/O on
/// `spawn_blocking` so the runtime is never stalled.
///
/// # Design Notes
///
/// - **Whole-chain writes**: `save` replaces the entire persisted chain. It
///   either fully succeeds or leaves the previous chain intact.
/// - **No silent loss**: unreadable data is moved aside by `quarantine`,
///   never deleted.
/// - **No locking**: two writers interleaving load/save lose updates. The
///   ledger serializes writers above this layer.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Read the persisted chain. Never writes.
    async fn try_load(&self) -> Result<LoadOutcome>;

    /// Atomically overwrite the persisted chain.
    async fn save(&self, chain: &Chain) -> Result<()>;

    /// Move the persisted data aside under a timestamp-qualified name.
    ///
    /// Returns the new name.
    async fn quarantine(&self) -> Result<String>;

    /// Delete the persisted chain. No-op if nothing is persisted.
    async fn clear(&self) -> Result<()>;
}

/// Extension trait implementing the load policy on top of [`ChainStore`].
pub trait ChainStoreExt: ChainStore {
    /// Load the chain, creating it if needed.
    ///
    /// **Writes as a side effect**: if nothing is persisted, a genesis chain
    /// is created and saved before being returned. Unreadable data is
    /// quarantined and replaced with a fresh genesis chain.
    fn load(&self) -> impl std::future::Future<Output = Result<Chain>> + Send;

    /// Like [`load`](Self::load), also reporting where the chain came from.
    fn load_with_origin(
        &self,
    ) -> impl std::future::Future<Output = Result<(Chain, LoadOrigin)>> + Send;

    /// Discard all history and recreate genesis.
    fn reset(&self) -> impl std::future::Future<Output = Result<Chain>> + Send;
}

impl<S: ChainStore + ?Sized> ChainStoreExt for S {
    async fn load(&self) -> Result<Chain> {
        let (chain, _) = self.load_with_origin().await?;
        Ok(chain)
    }

    async fn load_with_origin(&self) -> Result<(Chain, LoadOrigin)> {
        match self.try_load().await? {
            LoadOutcome::Loaded(chain) => {
                debug!(blocks = chain.len(), "loaded chain");
                Ok((chain, LoadOrigin::Existing))
            }
            LoadOutcome::Missing => {
                let chain = initialize(self).await?;
                Ok((chain, LoadOrigin::Initialized))
            }
            LoadOutcome::Corrupt { reason } => {
                let quarantined_as = self.quarantine().await?;
                warn!(
                    %reason,
                    %quarantined_as,
                    "persisted chain is unreadable; quarantined it and reinitialized genesis"
                );
                let chain = initialize(self).await?;
                Ok((
                    chain,
                    LoadOrigin::Recovered {
                        quarantined_as,
                        reason,
                    },
                ))
            }
        }
    }

    async fn reset(&self) -> Result<Chain> {
        self.clear().await?;
        info!("chain reset");
        self.load().await
    }
}

/// Create and persist a genesis chain.
async fn initialize<S: ChainStore + ?Sized>(store: &S) -> Result<Chain> {
    let chain = Chain::new(genesis(now_timestamp()));
    store.save(&chain).await?;
    info!(hash = %chain.genesis().hash, "initialized chain with genesis block");
    Ok(chain)
}
