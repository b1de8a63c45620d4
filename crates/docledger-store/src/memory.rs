//! In-memory implementation of the ChainStore trait.
//!
//! This is primarily for testing. It keeps the same JSON text a
//! [`FileStore`](crate::FileStore) would write, so corruption and
//! quarantine behave the same way, but nothing outlives the store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use docledger_core::Chain;

use crate::error::{Result, StoreError};
use crate::file::{now_millis, parse_chain, render_chain};
use crate::traits::{ChainStore, LoadOutcome};

/// In-memory store implementation.
///
/// Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    /// The persisted chain text, if any.
    persisted: Option<Vec<u8>>,

    /// Quarantined payloads in the order they were set aside.
    quarantined: Vec<(String, Vec<u8>)>,

    /// Number of successful saves.
    saves: usize,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose persisted data is `raw`, parseable or not.
    pub fn with_raw(raw: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.write() {
            inner.persisted = Some(raw.into());
        }
        store
    }

    /// The persisted bytes, if any.
    pub fn raw(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.persisted.clone())
    }

    /// Quarantined payloads as `(name, bytes)`, oldest first.
    pub fn quarantined(&self) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(self.read()?.quarantined.clone())
    }

    /// How many times `save` has succeeded.
    pub fn save_count(&self) -> Result<usize> {
        Ok(self.read()?.saves)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Task(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Task(format!("lock poisoned: {}", e)))
    }
}

#[async_trait]
impl ChainStore for MemoryStore {
    async fn try_load(&self) -> Result<LoadOutcome> {
        let inner = self.read()?;
        Ok(match &inner.persisted {
            None => LoadOutcome::Missing,
            Some(bytes) => parse_chain(bytes),
        })
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        let json = render_chain(chain)?;
        let mut inner = self.write()?;
        inner.persisted = Some(json.into_bytes());
        inner.saves += 1;
        Ok(())
    }

    async fn quarantine(&self) -> Result<String> {
        let mut inner = self.write()?;
        let bytes = inner.persisted.take().ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "nothing to quarantine",
            ))
        })?;

        let name = format!("memory.corrupt.{}.{}", now_millis(), inner.quarantined.len());
        inner.quarantined.push((name.clone(), bytes));
        Ok(name)
    }

    async fn clear(&self) -> Result<()> {
        self.write()?.persisted = None;
        Ok(())
    }
}
