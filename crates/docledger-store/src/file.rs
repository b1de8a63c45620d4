//! JSON file implementation of the ChainStore trait.
//!
//! The chain is one pretty-printed JSON array, rewritten wholesale on every
//! save. Writes go to a sibling temp file which is fsynced and renamed over
//! the target, so readers see either the old chain or the new one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use docledger_core::Chain;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::{ChainStore, LoadOutcome};

/// Environment variable naming the chain file.
pub const CHAIN_FILE_ENV: &str = "DOCLEDGER_CHAIN_FILE";

/// Chain file used when [`CHAIN_FILE_ENV`] is unset.
pub const DEFAULT_CHAIN_FILE: &str = "chain.json";

/// File-backed chain store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use the chain file at `path`. Nothing is touched until first use.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Use the chain file named by `DOCLEDGER_CHAIN_FILE`, or `chain.json`.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CHAIN_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHAIN_FILE));
        Self::open(path)
    }

    /// The chain file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path next to the chain file with `suffix` appended to its name.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_CHAIN_FILE));
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

/// Parse persisted JSON text into a load outcome.
pub(crate) fn parse_chain(bytes: &[u8]) -> LoadOutcome {
    match serde_json::from_slice::<Chain>(bytes) {
        Ok(chain) => LoadOutcome::Loaded(chain),
        Err(e) => LoadOutcome::Corrupt {
            reason: e.to_string(),
        },
    }
}

/// Render a chain as persisted JSON text.
pub(crate) fn render_chain(chain: &Chain) -> Result<String> {
    serde_json::to_string_pretty(chain).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Current Unix time in milliseconds.
pub(crate) fn now_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[async_trait]
impl ChainStore for FileStore {
    async fn try_load(&self) -> Result<LoadOutcome> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || match fs::read(&path) {
            Ok(bytes) => Ok(parse_chain(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(LoadOutcome::Missing),
            Err(e) => Err(StoreError::Io(e)),
        })
        .await?
    }

    async fn save(&self, chain: &Chain) -> Result<()> {
        let json = render_chain(chain)?;
        let path = self.path.clone();
        let tmp = self.sibling(".tmp");
        let blocks = chain.len();

        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let written = File::create(&tmp).and_then(|mut file| {
                file.write_all(json.as_bytes())?;
                file.sync_all()
            });

            // The temp file never outlives a failed save.
            if let Err(e) = written.and_then(|()| fs::rename(&tmp, &path)) {
                if tmp.is_file() {
                    let _ = fs::remove_file(&tmp);
                }
                return Err(StoreError::Io(e));
            }

            debug!(path = %path.display(), blocks, "saved chain");
            Ok(())
        })
        .await?
    }

    async fn quarantine(&self) -> Result<String> {
        let path = self.path.clone();
        let base = self.sibling(&format!(".corrupt.{}", now_millis()));

        tokio::task::spawn_blocking(move || {
            let mut target = base.clone();
            let mut attempt = 0u32;
            while target.exists() {
                attempt += 1;
                let mut name = base.clone().into_os_string();
                name.push(format!(".{}", attempt));
                target = PathBuf::from(name);
            }

            fs::rename(&path, &target)?;
            Ok(target.display().to_string())
        })
        .await?
    }

    async fn clear(&self) -> Result<()> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        })
        .await?
    }
}
