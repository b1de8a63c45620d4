//! Response bodies for a transport shell.
//!
//! The ledger does not serve HTTP itself. These types carry the JSON shapes a
//! shell emits for each operation, so every shell renders them the same way.

use docledger_core::{Block, Chain};
use serde::Serialize;

use crate::error::LedgerError;

/// Body returned after a successful append.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppendResponse {
    pub success: bool,
    pub block: Block,
}

impl From<Block> for AppendResponse {
    fn from(block: Block) -> Self {
        Self {
            success: true,
            block,
        }
    }
}

/// Body returned after a reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub chain: Chain,
}

impl From<Chain> for ResetResponse {
    fn from(chain: Chain) -> Self {
        Self {
            success: true,
            chain,
        }
    }
}

/// Body returned by a document lookup. `block` is omitted when not found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl From<Option<Block>> for LookupResponse {
    fn from(block: Option<Block>) -> Self {
        Self {
            found: block.is_some(),
            block,
        }
    }
}

/// Body returned for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&LedgerError> for ErrorResponse {
    fn from(err: &LedgerError) -> Self {
        let error = match err {
            LedgerError::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docledger_core::genesis;
    use serde_json::json;

    #[test]
    fn test_lookup_not_found_omits_block() {
        let body = serde_json::to_value(LookupResponse::from(None)).unwrap();
        assert_eq!(body, json!({ "found": false }));
    }

    #[test]
    fn test_lookup_found_includes_block() {
        let block = genesis("2024-01-15T10:30:00.000Z".into());
        let body = serde_json::to_value(LookupResponse::from(Some(block))).unwrap();
        assert_eq!(body["found"], json!(true));
        assert_eq!(body["block"]["docHash"], json!("GENESIS"));
    }

    #[test]
    fn test_reset_serializes_chain_as_array() {
        let chain = Chain::new(genesis("2024-01-15T10:30:00.000Z".into()));
        let body = serde_json::to_value(ResetResponse::from(chain)).unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["chain"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_error_response_uses_bare_message() {
        let err = LedgerError::InvalidInput("docHash required".into());
        let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(body, json!({ "error": "docHash required" }));
    }
}
