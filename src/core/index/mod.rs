//! Indexing pipeline: orchestrator, sub-indexers and status
//! reporting.
//!
//! - **orchestrator**: sequences full/incremental passes, targeted
//!   updates and purges; owns the exclusive write session
//! - **fsindexer**: filesystem crawl + per-document worker pool
//! - **importqueue**: secondary queued-import source
//! - **status**: phase machine, progress counters, side-channel file

pub mod fsindexer;
pub mod importqueue;
pub mod orchestrator;
pub mod status;

pub use fsindexer::{DocTask, FsIndexer};
pub use importqueue::ImportQueueIndexer;
pub use orchestrator::{Indexer, Speller};
pub use status::{
    read_status_file, FileStatusSink, IndexStatus, Phase, StatusTracker, StatusUpdater,
};
