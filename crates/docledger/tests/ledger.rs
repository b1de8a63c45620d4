//! End-to-end ledger behavior over each storage backend.

use std::collections::HashSet;
use std::sync::Arc;

use docledger::core::{verify_chain, CoreError};
use docledger::store::{
    ChainStore, FileStore, LoadOutcome, MemoryStore, SqliteStore, StoreError,
};
use docledger::{ErrorResponse, Ledger, LedgerConfig, LedgerError, LookupResponse, Metadata};
use docledger_testkit::fixtures::{golden_chain, note, tamper, TestFixture};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn exercise<S: ChainStore>(ledger: &Ledger<S>) {
    let genesis = ledger.chain().await.unwrap();
    assert_eq!(genesis.len(), 1);

    let a = ledger.append("docHashA", note("doc1")).await.unwrap();
    let b = ledger.append("docHashB", Metadata::new()).await.unwrap();
    assert_eq!((a.index, b.index), (1, 2));
    assert_eq!(a.prev_hash, genesis.tip().hash);
    assert_eq!(b.prev_hash, a.hash);

    let report = ledger.verify().await.unwrap();
    assert!(report.is_valid(), "{:?}", report.errors());

    let found = ledger.find_by_doc_hash("docHashA").await.unwrap();
    assert_eq!(found.as_ref(), Some(&a));
    assert!(ledger.find_by_doc_hash("docHashZ").await.unwrap().is_none());

    let fresh = ledger.reset().await.unwrap();
    assert_eq!(fresh.len(), 1);
    assert!(ledger.find_by_doc_hash("docHashA").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_backend() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let ledger = Ledger::new(
        FileStore::open(dir.path().join("chain.json")),
        LedgerConfig::default(),
    );
    exercise(&ledger).await;
}

#[tokio::test]
async fn test_sqlite_backend() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(dir.path().join("ledger.db")).unwrap();
    exercise(&Ledger::new(store, LedgerConfig::default())).await;
}

#[tokio::test]
async fn test_memory_backend() {
    init_tracing();
    exercise(&TestFixture::new().ledger()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_lose_nothing() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(Ledger::new(
        FileStore::open(dir.path().join("chain.json")),
        LedgerConfig::default(),
    ));

    let mut handles = Vec::new();
    for i in 0..32 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .append(&format!("doc-{}", i), Metadata::new())
                .await
                .unwrap()
        }));
    }

    let mut indices = HashSet::new();
    for handle in handles {
        let block = handle.await.unwrap();
        assert!(indices.insert(block.index), "index {} reused", block.index);
    }

    let chain = ledger.chain().await.unwrap();
    assert_eq!(chain.len(), 33);
    for (position, block) in chain.iter().enumerate() {
        assert_eq!(block.index, position as u64);
    }
    assert!(verify_chain(&chain).is_valid());

    let docs: HashSet<&str> = chain.iter().skip(1).map(|b| b.doc_hash.as_str()).collect();
    assert_eq!(docs.len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_during_first_append() {
    init_tracing();
    let fixture = TestFixture::new();
    let ledger = Arc::new(fixture.ledger());

    let writer = {
        let ledger = ledger.clone();
        tokio::spawn(async move { ledger.append("docHashA", Metadata::new()).await.unwrap() })
    };
    let readers: Vec<_> = (0..8)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.chain().await.unwrap() })
        })
        .collect();

    let block = writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    // Lazy genesis from a reader never replaced the writer's chain.
    let chain = ledger.chain().await.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.tip(), &block);
}

#[tokio::test]
async fn test_corrupt_file_recovers_through_ledger() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.json");
    std::fs::write(&path, b"[{\"index\": 0, \"timest").unwrap();

    let ledger = Ledger::new(FileStore::open(&path), LedgerConfig::default());
    let block = ledger.append("docHashA", Metadata::new()).await.unwrap();
    assert_eq!(block.index, 1);

    let quarantined: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("chain.json.corrupt."))
        .collect();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(
        std::fs::read(dir.path().join(&quarantined[0])).unwrap(),
        b"[{\"index\": 0, \"timest"
    );
}

#[tokio::test]
async fn test_invalid_input_touches_nothing() {
    let fixture = TestFixture::with_chain(&golden_chain()).await;
    let ledger = fixture.ledger();
    let saves = fixture.store.save_count().unwrap();

    let err = ledger.append("", note("ignored")).await.unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(
        serde_json::to_value(ErrorResponse::from(&err)).unwrap(),
        serde_json::json!({ "error": "docHash required" })
    );

    assert!(matches!(
        ledger.find_by_doc_hash("").await,
        Err(LedgerError::InvalidInput(_))
    ));

    assert_eq!(fixture.store.save_count().unwrap(), saves);
    assert_eq!(ledger.chain().await.unwrap(), golden_chain());
}

#[tokio::test]
async fn test_tampered_store_is_reported_not_repaired() {
    init_tracing();
    let tampered = tamper(&golden_chain(), 1, |b| b.doc_hash = "forged".into());
    let fixture = TestFixture::with_chain(&tampered).await;
    let ledger = fixture.ledger();

    let report = ledger.verify().await.unwrap();
    assert_eq!(
        report.errors(),
        vec!["Block 1: hash mismatch (stored vs recomputed)".to_string()]
    );

    // Still a loadable chain; nothing was quarantined.
    assert!(matches!(
        fixture.store.try_load().await.unwrap(),
        LoadOutcome::Loaded(_)
    ));
    assert!(fixture.store.quarantined().unwrap().is_empty());

    let lookup = LookupResponse::from(ledger.find_by_doc_hash("forged").await.unwrap());
    assert!(lookup.found);
}

#[tokio::test]
async fn test_broken_link_is_reported_on_next_block() {
    let tampered = tamper(&golden_chain(), 1, |b| {
        b.hash = docledger::BlockHash::from_hex_unchecked("ab".repeat(32))
    });
    let fixture = TestFixture::with_chain(&tampered).await;

    let report = fixture.ledger().verify().await.unwrap();
    assert_eq!(
        report.errors(),
        vec![
            "Block 1: hash mismatch (stored vs recomputed)".to_string(),
            "Block 2: prevHash does not match index 1 hash".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_memory_store_shared_between_ledgers() {
    let store = Arc::new(MemoryStore::new());
    let first = Ledger::with_shared_store(store.clone(), LedgerConfig::default());
    let second = Ledger::with_shared_store(store, LedgerConfig::default());

    first.append("docHashA", Metadata::new()).await.unwrap();
    assert!(second.find_by_doc_hash("docHashA").await.unwrap().is_some());
}

#[tokio::test]
async fn test_failed_save_propagates_and_keeps_chain() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.json");
    let ledger = Ledger::new(FileStore::open(&path), LedgerConfig::default());
    ledger.append("docHashA", Metadata::new()).await.unwrap();
    let before = ledger.chain().await.unwrap();

    // Occupy the temp file name with a non-empty directory.
    let tmp = dir.path().join("chain.json.tmp");
    std::fs::create_dir(&tmp).unwrap();
    std::fs::write(tmp.join("keep"), b"x").unwrap();

    let err = ledger.append("docHashB", Metadata::new()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Store(StoreError::Io(_))));
    assert!(!err.is_invalid_input());

    assert_eq!(ledger.chain().await.unwrap(), before);
    assert!(ledger.find_by_doc_hash("docHashB").await.unwrap().is_none());

    // Once the obstruction is gone, appends resume from the same tip.
    std::fs::remove_dir_all(&tmp).unwrap();
    let block = ledger.append("docHashB", Metadata::new()).await.unwrap();
    assert_eq!(block.index, 2);
    assert_eq!(block.prev_hash, before.tip().hash);
}

#[tokio::test]
async fn test_append_at_max_index_fails_cleanly() {
    let mut blocks = golden_chain().into_blocks();
    blocks.truncate(1);
    blocks[0].index = u64::MAX;
    blocks[0].hash = blocks[0].recompute_hash();
    let fixture = TestFixture::with_chain(&docledger::Chain::from_blocks(blocks).unwrap()).await;
    let ledger = fixture.ledger();
    let saves = fixture.store.save_count().unwrap();

    let err = ledger.append("doc", Metadata::new()).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Core(CoreError::IndexOverflow(u64::MAX))
    ));
    assert_eq!(fixture.store.save_count().unwrap(), saves);
    assert_eq!(ledger.chain().await.unwrap().len(), 1);
}
