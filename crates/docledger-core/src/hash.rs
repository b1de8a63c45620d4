//! Block hashing.
//!
//! A block hash is SHA-256 over the UTF-8 bytes of
//!
//! ```text
//! {index}|{timestamp}|{docHash}|{prevHash}
//! ```
//!
//! with the index in decimal and the result rendered as lowercase hex.
//! The encoding is frozen: chains written by any compatible implementation
//! must verify here.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a block hash in hex characters (256 bits).
pub const HASH_HEX_LENGTH: usize = 64;

/// Field separator in the hash preimage.
const FIELD_SEPARATOR: char = '|';

/// A block digest as lowercase hex.
///
/// Any text is accepted on load. Malformed values surface as validation
/// faults, not as parse errors.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// The all-zero digest used as `prevHash` of the genesis block.
    pub fn sentinel() -> Self {
        Self("0".repeat(HASH_HEX_LENGTH))
    }

    /// Wrap an existing hex string without checking it.
    pub fn from_hex_unchecked(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Whether this is the genesis sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.0.len() == HASH_HEX_LENGTH && self.0.bytes().all(|b| b == b'0')
    }

    /// Whether the value is a well-formed digest (64 lowercase hex chars).
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == HASH_HEX_LENGTH
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    /// Get the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into raw bytes, if well formed.
    pub fn to_bytes(&self) -> Option<[u8; 32]> {
        let bytes = hex::decode(&self.0).ok()?;
        bytes.try_into().ok()
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.0.get(..16).unwrap_or(&self.0);
        write!(f, "BlockHash({})", shown)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlockHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }
}

/// Compute the hash of a block from its linking fields.
///
/// `metadata` is not part of the preimage.
pub fn compute_block_hash(
    index: u64,
    timestamp: &str,
    doc_hash: &str,
    prev_hash: &BlockHash,
) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update([FIELD_SEPARATOR as u8]);
    hasher.update(timestamp.as_bytes());
    hasher.update([FIELD_SEPARATOR as u8]);
    hasher.update(doc_hash.as_bytes());
    hasher.update([FIELD_SEPARATOR as u8]);
    hasher.update(prev_hash.as_str().as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    BlockHash::from(digest)
}
