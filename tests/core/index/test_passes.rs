// Full passes, incremental updates, purge and cancellation

use crate::common::{config_for, TestCorpus};
use ferret::core::index::{Indexer, IndexStatus, StatusUpdater};
use ferret::core::store::{IndexStore, MemStore, FAM_STEM};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
#[serial]
fn test_empty_corpus_full_pass() {
    let corpus = TestCorpus::empty();
    let mut indexer = Indexer::new(config_for(&corpus), MemStore::ephemeral(), None);
    let stats = indexer.index(true, false).unwrap();
    assert_eq!(stats.docs_indexed, 0);
    assert_eq!(stats.docs_purged, 0);
    assert!(!indexer.store().lock().is_open());
}

#[test]
#[serial]
fn test_full_pass_then_incremental() {
    let corpus = TestCorpus::with_files(&[
        ("a.txt", "the running dog"),
        ("b.txt", "sleeping cats everywhere"),
        ("sub/c.txt", "more words deeper down"),
    ]);
    let mut indexer = Indexer::new(config_for(&corpus), MemStore::ephemeral(), None);

    let stats = indexer.index(true, false).unwrap();
    assert_eq!(stats.docs_indexed, 3);

    // nothing changed: the second pass reprocesses nothing
    let stats = indexer.index(false, false).unwrap();
    assert_eq!(stats.docs_indexed, 0);
    assert_eq!(stats.files_seen, 3);

    // touch one file: only that one is reprocessed
    corpus.write("a.txt", "the running dog barks");
    let stats = indexer.index(false, false).unwrap();
    assert_eq!(stats.docs_indexed, 1);
}

#[test]
#[serial]
fn test_purge_drops_deleted_sources() {
    let corpus = TestCorpus::with_files(&[("keep.txt", "alpha"), ("gone.txt", "beta")]);
    let mut indexer = Indexer::new(config_for(&corpus), MemStore::ephemeral(), None);
    indexer.index(true, false).unwrap();

    corpus.remove("gone.txt");
    let stats = indexer.index(false, false).unwrap();
    assert_eq!(stats.docs_purged, 1);

    let store = indexer.store();
    let guard = store.lock();
    assert_eq!(guard.doc_count(), 1);
    assert!(!guard.terms_from(None, 100).contains(&"beta".to_string()));
}

#[test]
#[serial]
fn test_full_pass_builds_stem_databases() {
    let corpus = TestCorpus::with_files(&[("doc.txt", "running runners walked")]);
    let mut indexer = Indexer::new(config_for(&corpus), MemStore::ephemeral(), None);
    indexer.index(true, false).unwrap();

    let store = indexer.store();
    let guard = store.lock();
    assert_eq!(guard.family_members(FAM_STEM), ["english"]);
    assert!(guard
        .synonyms(FAM_STEM, "english", "run")
        .contains(&"running".to_string()));
}

#[test]
#[serial]
fn test_cancellation_leaves_store_closed() {
    struct RefuseImmediately;
    impl StatusUpdater for RefuseImmediately {
        fn update(&self, _status: &IndexStatus) -> bool {
            false
        }
    }

    let corpus = TestCorpus::with_files(&[("a.txt", "words")]);
    let mut indexer = Indexer::new(
        config_for(&corpus),
        MemStore::ephemeral(),
        Some(Arc::new(RefuseImmediately)),
    );

    let err = indexer.index(true, false).unwrap_err();
    assert!(err.is_cancelled());
    assert!(!indexer.store().lock().is_open());
}

#[test]
#[serial]
fn test_cancellation_mid_crawl_stops_early() {
    struct RefuseAfter(AtomicUsize, usize);
    impl StatusUpdater for RefuseAfter {
        fn update(&self, _status: &IndexStatus) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst) < self.1
        }
    }

    let mut files = Vec::new();
    let contents: Vec<(String, String)> = (0..50)
        .map(|i| (format!("f{i:02}.txt"), format!("document number {i}")))
        .collect();
    for (name, content) in &contents {
        files.push((name.as_str(), content.as_str()));
    }
    let corpus = TestCorpus::with_files(&files);

    let mut indexer = Indexer::new(
        config_for(&corpus),
        MemStore::ephemeral(),
        Some(Arc::new(RefuseAfter(AtomicUsize::new(0), 10))),
    );
    let err = indexer.index(true, false).unwrap_err();
    assert!(err.is_cancelled());
    // far fewer than 50 files were examined before the stop
    assert!(indexer.store().lock().doc_count() < 50);
}

#[test]
#[serial]
fn test_targeted_update_and_erase() {
    let corpus = TestCorpus::with_files(&[("a.txt", "original text")]);
    let mut indexer = Indexer::new(config_for(&corpus), MemStore::ephemeral(), None);
    indexer.index(true, false).unwrap();

    // targeted update picks up new content without a crawl
    corpus.write("a.txt", "replacement text");
    let path = corpus.path().join("a.txt");
    let stats = indexer.index_files(std::slice::from_ref(&path)).unwrap();
    assert_eq!(stats.docs_indexed, 1);
    {
        let store = indexer.store();
        let guard = store.lock();
        let vocab = guard.terms_from(None, 100);
        assert!(vocab.contains(&"replacement".to_string()));
        assert!(!vocab.contains(&"original".to_string()));
    }

    // purge-only removes the entry without touching the file
    let erased = indexer.purge_files(&[path.clone()]).unwrap();
    assert_eq!(erased, 1);
    assert!(path.exists());
    assert_eq!(indexer.store().lock().doc_count(), 0);
}

#[test]
#[serial]
fn test_bad_documents_do_not_stop_the_pass() {
    let corpus = TestCorpus::with_files(&[("good.txt", "indexable words")]);
    std::fs::write(corpus.path().join("bad.txt"), [0xc3, 0x28, 0xff]).unwrap();

    let mut indexer = Indexer::new(config_for(&corpus), MemStore::ephemeral(), None);
    let stats = indexer.index(true, false).unwrap();

    // both documents count as done, the bad one was skipped
    assert_eq!(stats.docs_indexed, 2);
    let store = indexer.store();
    let guard = store.lock();
    assert!(guard
        .terms_from(None, 100)
        .contains(&"indexable".to_string()));
}
