//! Block and Chain: the ledger data structure.
//!
//! A [`Block`] certifies that a document fingerprint existed at a point in
//! time. A [`Chain`] is the non-empty, ordered sequence of blocks starting at
//! the genesis block.
//!
//! ## Persisted shape
//!
//! Both types serialize to the JSON layout the ledger has always used:
//!
//! ```json
//! [
//!   {
//!     "index": 0,
//!     "timestamp": "2024-01-15T10:30:00.000Z",
//!     "docHash": "GENESIS",
//!     "metadata": { "note": "Genesis" },
//!     "prevHash": "0000...0000",
//!     "hash": "9330...8873"
//!   }
//! ]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::hash::{compute_block_hash, BlockHash};

/// The `docHash` carried by the genesis block.
pub const GENESIS_DOC_HASH: &str = "GENESIS";

/// The `metadata.note` carried by the genesis block.
pub const GENESIS_NOTE: &str = "Genesis";

/// Caller-supplied annotation. Insertion order is preserved and the
/// contents are never interpreted.
pub type Metadata = serde_json::Map<String, Value>;

/// Key holding a persisted `metadata` value that was not a JSON object.
pub const SCALAR_METADATA_KEY: &str = "value";

/// Normalize a persisted `metadata` value into an object.
///
/// `null` becomes `{}`; any other non-object value `v` becomes
/// `{"value": v}`. Metadata is outside the hash, so a chain loaded this way
/// still verifies.
pub fn metadata_from_value(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        Value::Null => Metadata::new(),
        other => {
            let mut metadata = Metadata::new();
            metadata.insert(SCALAR_METADATA_KEY.to_string(), other);
            metadata
        }
    }
}

fn deserialize_metadata<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(metadata_from_value)
}

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain. Genesis is 0.
    pub index: u64,

    /// ISO-8601 creation time. Opaque to validation.
    pub timestamp: String,

    /// Fingerprint of the certified document.
    pub doc_hash: String,

    /// Arbitrary annotation, not covered by the hash.
    #[serde(default, deserialize_with = "deserialize_metadata")]
    pub metadata: Metadata,

    /// Hash of the preceding block, or the sentinel for genesis.
    pub prev_hash: BlockHash,

    /// Hash of this block's linking fields, fixed at creation.
    pub hash: BlockHash,
}

impl Block {
    /// Recompute the hash from the stored linking fields.
    pub fn recompute_hash(&self) -> BlockHash {
        compute_block_hash(self.index, &self.timestamp, &self.doc_hash, &self.prev_hash)
    }

    /// Whether the stored hash matches the linking fields.
    pub fn hash_is_consistent(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    /// Whether this block has the canonical genesis shape.
    ///
    /// Does not check the hash.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.doc_hash == GENESIS_DOC_HASH && self.prev_hash.is_sentinel()
    }
}

/// The full ordered sequence of blocks, genesis first.
///
/// Never empty. Existing blocks cannot be mutated through a `Chain`; the
/// only structural change is [`Chain::push`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain from its genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    /// Build a chain from blocks in order.
    ///
    /// Only non-emptiness is enforced; linkage is the validator's job, so a
    /// tampered chain can still be represented and reported on.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, CoreError> {
        if blocks.is_empty() {
            return Err(CoreError::EmptyChain);
        }
        Ok(Self { blocks })
    }

    /// Take the blocks back out.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The first block.
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The last block.
    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Block at a chain position.
    pub fn get(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    /// Iterate blocks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Append a new tail block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

impl TryFrom<Vec<Block>> for Chain {
    type Error = CoreError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Self::from_blocks(blocks)
    }
}

impl From<Chain> for Vec<Block> {
    fn from(chain: Chain) -> Self {
        chain.blocks
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
