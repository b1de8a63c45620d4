//! SQLite implementation of the ChainStore trait.
//!
//! One row per block in the `blocks` table. Saves replace every row inside a
//! single transaction, so a failed save leaves the previous chain intact.
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use docledger_core::{metadata_from_value, Block, BlockHash, Chain};
use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::file::now_millis;
use crate::migration::{self, CREATE_BLOCKS_TABLE};
use crate::traits::{ChainStore, LoadOutcome};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    ///
    /// Only unreadable rows are quarantined. A file that is not a SQLite
    /// database at all fails here with [`StoreError::Database`] and is left
    /// untouched; moving it aside is up to the operator.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| {
        StoreError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            Some(format!("mutex poisoned: {}", e)),
        ))
    })
}

/// Raw column values of one `blocks` row.
type BlockRow = (i64, String, String, String, String, String);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<BlockRow> {
    Ok((
        row.get("idx")?,
        row.get("timestamp")?,
        row.get("doc_hash")?,
        row.get("metadata")?,
        row.get("prev_hash")?,
        row.get("hash")?,
    ))
}

/// Turn a raw row into a block, or explain why it is unreadable.
fn raw_to_block(raw: BlockRow) -> std::result::Result<Block, String> {
    let (idx, timestamp, doc_hash, metadata, prev_hash, hash) = raw;

    let index = u64::try_from(idx).map_err(|_| format!("negative block index {}", idx))?;
    let metadata = serde_json::from_str(&metadata)
        .map(metadata_from_value)
        .map_err(|e| format!("block {} metadata: {}", index, e))?;

    Ok(Block {
        index,
        timestamp,
        doc_hash,
        metadata,
        prev_hash: BlockHash::from_hex_unchecked(prev_hash),
        hash: BlockHash::from_hex_unchecked(hash),
    })
}

/// Whether a row read failed because the stored value has the wrong shape.
fn is_shape_error(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

#[async_trait]
impl ChainStore for SqliteStore {
    async fn try_load(&self) -> Result<LoadOutcome> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;

            let mut stmt = conn.prepare(
                "SELECT idx, timestamp, doc_hash, metadata, prev_hash, hash
                 FROM blocks ORDER BY idx ASC",
            )?;
            let rows = stmt.query_map([], row_to_raw)?;

            let mut blocks = Vec::new();
            for row in rows {
                let raw = match row {
                    Ok(raw) => raw,
                    Err(e) if is_shape_error(&e) => {
                        return Ok(LoadOutcome::Corrupt {
                            reason: e.to_string(),
                        })
                    }
                    Err(e) => return Err(StoreError::Database(e)),
                };
                match raw_to_block(raw) {
                    Ok(block) => blocks.push(block),
                    Err(reason) => return Ok(LoadOutcome::Corrupt { reason }),
                }
            }

            if blocks.is_empty() {
                return Ok(LoadOutcome::Missing);
            }
            Ok(LoadOutcome::Loaded(Chain::from_blocks(blocks)?))
        })
        .await?
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        let mut rows = Vec::with_capacity(chain.len());
        for block in chain {
            let idx = i64::try_from(block.index).map_err(|_| {
                StoreError::Serialization(format!(
                    "block index {} exceeds the SQLite integer range",
                    block.index
                ))
            })?;
            let metadata = serde_json::to_string(&block.metadata)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            rows.push((idx, block.clone(), metadata));
        }
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = lock(&conn)?;
            let tx = conn.transaction()?;

            tx.execute("DELETE FROM blocks", [])?;
            {
                let mut insert = tx.prepare(
                    "INSERT INTO blocks (idx, timestamp, doc_hash, metadata, prev_hash, hash)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for (idx, block, metadata) in &rows {
                    insert.execute(params![
                        idx,
                        block.timestamp,
                        block.doc_hash,
                        metadata,
                        block.prev_hash.as_str(),
                        block.hash.as_str(),
                    ])?;
                }
            }
            tx.commit()?;

            debug!(blocks = rows.len(), "saved chain to sqlite");
            Ok(())
        })
        .await?
    }

    async fn quarantine(&self) -> Result<String> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = lock(&conn)?;
            let base = format!("blocks_corrupt_{}", now_millis());

            let exists = |conn: &Connection, name: &str| -> rusqlite::Result<bool> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    params![name],
                    |row| row.get::<_, i64>(0),
                )
                .map(|n| n > 0)
            };

            let mut name = base.clone();
            let mut attempt = 0u32;
            while exists(&*conn, &name)? {
                attempt += 1;
                name = format!("{}_{}", base, attempt);
            }

            let tx = conn.transaction()?;
            tx.execute_batch(&format!(
                "DROP INDEX IF EXISTS idx_blocks_doc_hash;
                 ALTER TABLE blocks RENAME TO \"{}\";",
                name
            ))?;
            tx.execute_batch(CREATE_BLOCKS_TABLE)?;
            tx.commit()?;

            Ok(name)
        })
        .await?
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            conn.execute("DELETE FROM blocks", [])?;
            Ok(())
        })
        .await?
    }
}
