// Status side-channel: what external pollers see

use crate::common::{config_for, TestCorpus};
use ferret::core::index::{read_status_file, FileStatusSink, Indexer, Phase};
use ferret::core::store::MemStore;
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
#[serial]
fn test_pass_reaches_done_in_status_file() {
    let corpus = TestCorpus::with_files(&[("a.txt", "some words here")]);
    let state = TempDir::new().unwrap();
    let status_path = state.path().join("idxstatus.txt");

    let mut indexer = Indexer::new(
        config_for(&corpus),
        MemStore::ephemeral(),
        Some(Arc::new(FileStatusSink::new(&status_path))),
    );
    indexer.index(true, false).unwrap();

    let status = read_status_file(&status_path).unwrap();
    assert_eq!(status.phase, Phase::Done);
    assert_eq!(status.docs_done, 1);
    assert_eq!(status.files_done, 1);
    assert_eq!(status.db_total_docs, 1);
}

#[test]
#[serial]
fn test_empty_corpus_reports_zero_docs_done() {
    let corpus = TestCorpus::empty();
    let state = TempDir::new().unwrap();
    let status_path = state.path().join("idxstatus.txt");

    let mut indexer = Indexer::new(
        config_for(&corpus),
        MemStore::ephemeral(),
        Some(Arc::new(FileStatusSink::new(&status_path))),
    );
    indexer.index(true, false).unwrap();

    let status = read_status_file(&status_path).unwrap();
    assert_eq!(status.phase, Phase::Done);
    assert_eq!(status.docs_done, 0);
}

#[test]
#[serial]
fn test_monitor_phase_report() {
    let corpus = TestCorpus::empty();
    let state = TempDir::new().unwrap();
    let status_path = state.path().join("idxstatus.txt");

    let indexer: Indexer<MemStore> = Indexer::new(
        config_for(&corpus),
        MemStore::ephemeral(),
        Some(Arc::new(FileStatusSink::new(&status_path))),
    );
    assert!(indexer.report_monitor());

    let status = read_status_file(&status_path).unwrap();
    assert_eq!(status.phase, Phase::Monitor);
}

#[test]
fn test_missing_status_file_reads_as_none() {
    let state = TempDir::new().unwrap();
    assert!(read_status_file(&state.path().join("nope")).is_none());
}
