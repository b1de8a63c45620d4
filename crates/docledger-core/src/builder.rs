//! Block construction: the genesis block and each successor.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::block::{Block, Metadata, GENESIS_DOC_HASH, GENESIS_NOTE};
use crate::error::{CoreError, Result};
use crate::hash::{compute_block_hash, BlockHash};

/// Build the genesis block for a new chain.
pub fn genesis(timestamp: String) -> Block {
    let prev_hash = BlockHash::sentinel();
    let hash = compute_block_hash(0, &timestamp, GENESIS_DOC_HASH, &prev_hash);

    let mut metadata = Metadata::new();
    metadata.insert("note".to_string(), Value::String(GENESIS_NOTE.to_string()));

    Block {
        index: 0,
        timestamp,
        doc_hash: GENESIS_DOC_HASH.to_string(),
        metadata,
        prev_hash,
        hash,
    }
}

/// Build the block that follows `prev`.
///
/// Returns `InvalidInput` if `doc_hash` is empty and `IndexOverflow` if
/// `prev` is at `u64::MAX`.
pub fn next_block(
    prev: &Block,
    doc_hash: &str,
    metadata: Metadata,
    timestamp: String,
) -> Result<Block> {
    if doc_hash.is_empty() {
        return Err(CoreError::InvalidInput("docHash required".into()));
    }

    let index = prev
        .index
        .checked_add(1)
        .ok_or(CoreError::IndexOverflow(prev.index))?;
    let prev_hash = prev.hash.clone();
    let hash = compute_block_hash(index, &timestamp, doc_hash, &prev_hash);

    Ok(Block {
        index,
        timestamp,
        doc_hash: doc_hash.to_string(),
        metadata,
        prev_hash,
        hash,
    })
}

/// Current UTC time as ISO-8601 with millisecond precision,
/// e.g. `2024-01-15T10:30:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_genesis_fields() {
        let g = genesis("2024-01-15T10:30:00.000Z".to_string());

        assert_eq!(g.index, 0);
        assert_eq!(g.doc_hash, "GENESIS");
        assert_eq!(g.prev_hash, BlockHash::sentinel());
        assert_eq!(serde_json::Value::Object(g.metadata.clone()), json!({"note": "Genesis"}));
        assert_eq!(
            g.hash.as_str(),
            "933071310fd184c2d962d366c960478848fd78c8ef0335e3a6261fe8b7598873"
        );
    }

    #[test]
    fn test_next_block_links_to_prev() {
        let g = genesis("2024-01-15T10:30:00.000Z".to_string());
        let mut meta = Metadata::new();
        meta.insert("note".into(), json!("doc1"));

        let b1 = next_block(&g, "docHashA", meta.clone(), "2024-01-15T10:31:00.000Z".into()).unwrap();

        assert_eq!(b1.index, 1);
        assert_eq!(b1.prev_hash, g.hash);
        assert_eq!(b1.metadata, meta);
        assert_eq!(
            b1.hash.as_str(),
            "5d5f652560cf5097ef91ff3f00015d5af47148867a07431356422c98d2abb522"
        );
    }

    #[test]
    fn test_next_block_rejects_empty_doc_hash() {
        let g = genesis("2024-01-15T10:30:00.000Z".to_string());
        let result = next_block(&g, "", Metadata::new(), "t".into());
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_next_block_at_max_index_overflows() {
        let mut tip = genesis("2024-01-15T10:30:00.000Z".to_string());
        tip.index = u64::MAX;
        tip.hash = tip.recompute_hash();

        let result = next_block(&tip, "doc", Metadata::new(), "t".into());
        assert_eq!(result, Err(CoreError::IndexOverflow(u64::MAX)));
    }

    #[test]
    fn test_duplicate_doc_hash_allowed() {
        let g = genesis("2024-01-15T10:30:00.000Z".to_string());
        let b1 = next_block(&g, "same", Metadata::new(), "t1".into()).unwrap();
        let b2 = next_block(&b1, "same", Metadata::new(), "t2".into()).unwrap();
        assert_eq!(b2.index, 2);
        assert_ne!(b1.hash, b2.hash);
    }

    #[test]
    fn test_now_timestamp_format() {
        let ts = now_timestamp();
        // YYYY-MM-DDTHH:MM:SS.mmmZ
        assert_eq!(ts.len(), 24);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
    }
}
