//! Golden test vectors for deterministic verification.
//!
//! Every DocLedger implementation must produce these block hashes, so that
//! chain files written by one can be verified by another.

use docledger_core::{compute_block_hash, BlockHash, GENESIS_DOC_HASH};

/// The all-zero `prevHash` of the genesis block.
pub const SENTINEL: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Genesis hash at `2024-01-15T10:30:00.000Z`.
pub const GENESIS_HASH: &str = "933071310fd184c2d962d366c960478848fd78c8ef0335e3a6261fe8b7598873";

/// Hash of `docHashA` appended onto [`GENESIS_HASH`].
pub const BLOCK1_HASH: &str = "5d5f652560cf5097ef91ff3f00015d5af47148867a07431356422c98d2abb522";

/// Hash of `docHashB` appended onto [`BLOCK1_HASH`].
pub const BLOCK2_HASH: &str = "c9fee8d008be7c2d952f131729f4f3c895ed0333afa0212d609f5248d1bc4c5c";

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Block index.
    pub index: u64,
    /// Timestamp string, hashed verbatim.
    pub timestamp: &'static str,
    /// Certified document hash.
    pub doc_hash: &'static str,
    /// Predecessor hash.
    pub prev_hash: &'static str,
    /// Expected block hash (hex).
    pub expected_hash: &'static str,
}

impl GoldenVector {
    /// Hash this vector's inputs.
    pub fn compute(&self) -> BlockHash {
        compute_block_hash(
            self.index,
            self.timestamp,
            self.doc_hash,
            &BlockHash::from_hex_unchecked(self.prev_hash),
        )
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis",
            index: 0,
            timestamp: "2024-01-15T10:30:00.000Z",
            doc_hash: GENESIS_DOC_HASH,
            prev_hash: SENTINEL,
            expected_hash: GENESIS_HASH,
        },
        GoldenVector {
            name: "first document",
            index: 1,
            timestamp: "2024-01-15T10:31:00.000Z",
            doc_hash: "docHashA",
            prev_hash: GENESIS_HASH,
            expected_hash: BLOCK1_HASH,
        },
        GoldenVector {
            name: "second document",
            index: 2,
            timestamp: "2024-01-15T10:32:00.000Z",
            doc_hash: "docHashB",
            prev_hash: BLOCK1_HASH,
            expected_hash: BLOCK2_HASH,
        },
        GoldenVector {
            name: "genesis at the epoch",
            index: 0,
            timestamp: "1970-01-01T00:00:00.000Z",
            doc_hash: GENESIS_DOC_HASH,
            prev_hash: SENTINEL,
            expected_hash: "c7be3286c76477a44488278503380215e2c4368de69e7063b52fe6da715a7705",
        },
        GoldenVector {
            name: "non-ascii document hash",
            index: 1,
            timestamp: "2024-01-15T10:31:00.000Z",
            doc_hash: "é文書",
            prev_hash: GENESIS_HASH,
            expected_hash: "06f5339a29c9d3a772540cf9a2635c31469f20cfba14f720dbeaa2f05cef69c2",
        },
    ]
}

/// Check every golden vector against the hash function.
///
/// Returns `(name, matches, computed hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hash = v.compute();
            let matches = hash.as_str() == v.expected_hash;
            (v.name.to_string(), matches, hash.to_string())
        })
        .collect()
}
