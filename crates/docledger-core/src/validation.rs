//! Chain validation: linkage and hash integrity.
//!
//! [`verify_chain`] walks every consecutive pair `(prev, cur)` and runs two
//! independent checks:
//!
//! 1. `cur.prev_hash == prev.hash` (linkage)
//! 2. `cur.hash == H(cur.index, cur.timestamp, cur.doc_hash, cur.prev_hash)`
//!
//! A single block can therefore contribute two faults.
//!
//! ## Limitation
//!
//! Timestamps are hashed but never re-derived. A block rewritten with a
//! freshly recomputed hash is internally consistent; only the successor's
//! `prev_hash` exposes the rewrite, so an edited *tail* block that was
//! rehashed passes validation.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::block::{Block, Chain, GENESIS_DOC_HASH};

/// A single integrity fault found while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainFault {
    /// `prev_hash` does not equal the previous block's `hash`.
    BrokenLink { index: u64, prev_index: u64 },

    /// Stored `hash` does not match the recomputed one.
    HashMismatch { index: u64 },

    /// The first block is not a canonical genesis block.
    InvalidGenesis { reason: String },

    /// `index` does not follow the previous block's index.
    IndexGap { index: u64, expected: u64 },
}

impl ChainFault {
    /// The index of the block the fault is attributed to.
    pub fn index(&self) -> u64 {
        match self {
            ChainFault::BrokenLink { index, .. }
            | ChainFault::HashMismatch { index }
            | ChainFault::IndexGap { index, .. } => *index,
            ChainFault::InvalidGenesis { .. } => 0,
        }
    }
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFault::BrokenLink { index, prev_index } => write!(
                f,
                "Block {}: prevHash does not match index {} hash",
                index, prev_index
            ),
            ChainFault::HashMismatch { index } => {
                write!(f, "Block {}: hash mismatch (stored vs recomputed)", index)
            }
            ChainFault::InvalidGenesis { reason } => write!(f, "Genesis block: {}", reason),
            ChainFault::IndexGap { index, expected } => {
                write!(f, "Block {}: expected index {}", index, expected)
            }
        }
    }
}

/// Outcome of walking a chain.
///
/// Serializes as `{"valid": bool, "errors": [string]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Faults in discovery order.
    pub faults: Vec<ChainFault>,
}

impl VerificationReport {
    /// True iff no faults were found.
    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    /// Human-readable fault messages in order.
    pub fn errors(&self) -> Vec<String> {
        self.faults.iter().map(ToString::to_string).collect()
    }
}

impl Serialize for VerificationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("VerificationReport", 2)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors())?;
        state.end()
    }
}

/// Verify linkage and hash integrity of every consecutive pair.
///
/// Pure: never mutates the chain, never touches storage.
pub fn verify_chain(chain: &Chain) -> VerificationReport {
    let mut faults = Vec::new();
    for pair in chain.blocks().windows(2) {
        check_pair(&pair[0], &pair[1], &mut faults);
    }
    VerificationReport { faults }
}

/// [`verify_chain`] plus genesis shape and index continuity checks.
pub fn verify_chain_strict(chain: &Chain) -> VerificationReport {
    let mut faults = Vec::new();
    check_genesis(chain.genesis(), &mut faults);

    for pair in chain.blocks().windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let expected = prev.index.wrapping_add(1);
        if cur.index != expected {
            faults.push(ChainFault::IndexGap {
                index: cur.index,
                expected,
            });
        }
        check_pair(prev, cur, &mut faults);
    }
    VerificationReport { faults }
}

fn check_pair(prev: &Block, cur: &Block, faults: &mut Vec<ChainFault>) {
    if cur.prev_hash != prev.hash {
        faults.push(ChainFault::BrokenLink {
            index: cur.index,
            prev_index: prev.index,
        });
    }
    if !cur.hash_is_consistent() {
        faults.push(ChainFault::HashMismatch { index: cur.index });
    }
}

fn check_genesis(genesis: &Block, faults: &mut Vec<ChainFault>) {
    if genesis.index != 0 {
        faults.push(ChainFault::InvalidGenesis {
            reason: format!("index is {}, expected 0", genesis.index),
        });
    }
    if genesis.doc_hash != GENESIS_DOC_HASH {
        faults.push(ChainFault::InvalidGenesis {
            reason: format!("docHash is {:?}, expected {:?}", genesis.doc_hash, GENESIS_DOC_HASH),
        });
    }
    if !genesis.prev_hash.is_sentinel() {
        faults.push(ChainFault::InvalidGenesis {
            reason: "prevHash is not the zero sentinel".into(),
        });
    }
    if !genesis.hash_is_consistent() {
        faults.push(ChainFault::InvalidGenesis {
            reason: "hash mismatch (stored vs recomputed)".into(),
        });
    }
}
