//! Lookup by document fingerprint.

use crate::block::{Block, Chain};
use crate::error::{CoreError, Result};

/// Find the first block, in chain order, whose `doc_hash` equals the query.
///
/// The genesis block is searched too. An empty query is `InvalidInput`.
pub fn find_by_doc_hash<'a>(chain: &'a Chain, doc_hash: &str) -> Result<Option<&'a Block>> {
    if doc_hash.is_empty() {
        return Err(CoreError::InvalidInput("docHash required".into()));
    }
    Ok(chain.iter().find(|block| block.doc_hash == doc_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Metadata;
    use crate::builder::{genesis, next_block};

    fn chain_of(docs: &[&str]) -> Chain {
        let mut chain = Chain::new(genesis("2024-01-15T10:30:00.000Z".into()));
        for (i, doc) in docs.iter().enumerate() {
            let block =
                next_block(chain.tip(), doc, Metadata::new(), format!("ts-{}", i)).unwrap();
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_finds_block() {
        let chain = chain_of(&["a", "b", "c"]);
        let found = find_by_doc_hash(&chain, "b").unwrap().unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn test_returns_first_duplicate() {
        let chain = chain_of(&["a", "dup", "b", "dup"]);
        let found = find_by_doc_hash(&chain, "dup").unwrap().unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn test_not_found() {
        let chain = chain_of(&["a"]);
        assert!(find_by_doc_hash(&chain, "missing").unwrap().is_none());
    }

    #[test]
    fn test_genesis_is_searchable() {
        let chain = chain_of(&[]);
        let found = find_by_doc_hash(&chain, "GENESIS").unwrap().unwrap();
        assert_eq!(found.index, 0);
    }

    #[test]
    fn test_empty_query_rejected() {
        let chain = chain_of(&["a"]);
        assert!(matches!(
            find_by_doc_hash(&chain, ""),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
