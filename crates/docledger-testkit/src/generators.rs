//! Proptest generators for property-based testing.

use proptest::prelude::*;

use docledger_core::{next_block, Block, BlockHash, Chain, Metadata};
use serde_json::Value;

use crate::fixtures::{fixed_timestamp, genesis_chain};

/// Generate a non-empty document hash.
///
/// Mixes hex digests with arbitrary text, including `|` and non-ASCII.
pub fn doc_hash() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-f]{64}".prop_map(String::from),
        "[^\\x00]{1,40}".prop_map(String::from),
    ]
}

/// Generate a JSON leaf value.
pub fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::String),
    ]
}

/// Generate a metadata object of up to `max_keys` entries.
pub fn metadata(max_keys: usize) -> impl Strategy<Value = Metadata> {
    prop::collection::vec(("[a-z]{1,8}", json_leaf()), 0..=max_keys)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Parameters for one append.
#[derive(Debug, Clone)]
pub struct AppendParams {
    pub doc_hash: String,
    pub metadata: Metadata,
}

impl Arbitrary for AppendParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (doc_hash(), metadata(4))
            .prop_map(|(doc_hash, metadata)| AppendParams { doc_hash, metadata })
            .boxed()
    }
}

/// Build a valid chain by applying `appends` in order, one minute apart.
pub fn chain_from_appends(appends: &[AppendParams]) -> Chain {
    let mut chain = genesis_chain();
    for params in appends {
        let block = next_block(
            chain.tip(),
            &params.doc_hash,
            params.metadata.clone(),
            fixed_timestamp(chain.len() as u64),
        )
        .expect("generated doc hashes are non-empty");
        chain.push(block);
    }
    chain
}

/// Generate a valid chain of 1 to `max_appends + 1` blocks.
pub fn chain(max_appends: usize) -> impl Strategy<Value = Chain> {
    prop::collection::vec(any::<AppendParams>(), 0..=max_appends)
        .prop_map(|appends| chain_from_appends(&appends))
}

/// One way to tamper with a stored block.
#[derive(Debug, Clone)]
pub enum Tamper {
    DocHash(String),
    Timestamp(String),
    PrevHash(String),
    Hash(String),
    Index(u64),
}

impl Tamper {
    /// Apply the edit. Returns false if it leaves the block unchanged.
    pub fn apply(&self, block: &mut Block) -> bool {
        let before = block.clone();
        match self {
            Tamper::DocHash(v) => block.doc_hash = v.clone(),
            Tamper::Timestamp(v) => block.timestamp = v.clone(),
            Tamper::PrevHash(v) => block.prev_hash = BlockHash::from_hex_unchecked(v.clone()),
            Tamper::Hash(v) => block.hash = BlockHash::from_hex_unchecked(v.clone()),
            Tamper::Index(v) => block.index = *v,
        }
        *block != before
    }
}

/// Generate a single-field tamper of any hashed field.
pub fn tamper() -> impl Strategy<Value = Tamper> {
    prop_oneof![
        doc_hash().prop_map(Tamper::DocHash),
        "[0-9T:.Z-]{1,24}".prop_map(Tamper::Timestamp),
        "[0-9a-f]{64}".prop_map(Tamper::PrevHash),
        "[0-9a-f]{64}".prop_map(Tamper::Hash),
        any::<u64>().prop_map(Tamper::Index),
    ]
}
