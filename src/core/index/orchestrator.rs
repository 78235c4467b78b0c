//! Top-level indexing orchestrator.
//!
//! Owns the one exclusive write session on the index store and
//! sequences the phases of an indexing pass: crawl the configured
//! sources, purge stale entries, rebuild the expansion databases,
//! close, regenerate the spelling dictionary best-effort. Targeted
//! updates and purge-only runs share the per-document machinery but
//! skip purge and expansion rebuilds.
//!
//! Failure taxonomy: session open/close failures abort the whole
//! operation; a single document failing is skipped and counted;
//! stemming and spelling build failures disable the feature for the
//! rest of the process and never abort the pass.

use crate::core::config::Config;
use crate::core::error::{FerretError, Result};
use crate::core::expand::ExpansionBuilder;
use crate::core::extract::{PlainTextExtractor, TextExtractor};
use crate::core::index::fsindexer::{canon_sorted, FsIndexer};
use crate::core::index::importqueue::ImportQueueIndexer;
use crate::core::index::status::{IndexStatus, Phase, StatusTracker, StatusUpdater};
use crate::core::store::{IndexStore, OpenMode};
use crate::core::types::{Backend, DocInfo, IndexStats};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// At most one write session may be open process-wide. Enforced
/// here, not by the store.
static WRITE_SESSION_OPEN: AtomicBool = AtomicBool::new(false);

struct SessionGuard;

impl SessionGuard {
    fn acquire() -> Result<Self> {
        if WRITE_SESSION_OPEN
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FerretError::StorageError(
                "another write session is already open in this process".to_string(),
            ));
        }
        Ok(SessionGuard)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        WRITE_SESSION_OPEN.store(false, Ordering::SeqCst);
    }
}

/// Spelling dictionary generator collaborator. Failures degrade:
/// the feature is disabled until reconfigured, the pass succeeds.
pub trait Speller: Send {
    fn build(&self, store: &mut dyn IndexStore) -> Result<()>;
}

/// Orchestrates full passes, targeted updates and purges over one
/// index store.
pub struct Indexer<S: IndexStore + 'static> {
    config: Config,
    store: Arc<Mutex<S>>,
    updater: Option<Arc<dyn StatusUpdater>>,
    extractor: Arc<dyn TextExtractor>,
    speller: Option<Box<dyn Speller>>,
    /// Set on the first expansion-build failure; not retried every
    /// pass after that
    stem_disabled: bool,
    spell_disabled: bool,
}

impl<S: IndexStore + 'static> Indexer<S> {
    pub fn new(config: Config, store: S, updater: Option<Arc<dyn StatusUpdater>>) -> Self {
        Self {
            config,
            store: Arc::new(Mutex::new(store)),
            updater,
            extractor: Arc::new(PlainTextExtractor),
            speller: None,
            stem_disabled: false,
            spell_disabled: false,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_speller(mut self, speller: Box<dyn Speller>) -> Self {
        self.speller = speller.into();
        self
    }

    /// Full pass: crawl every configured source, purge entries whose
    /// source is gone, rebuild the expansion databases, close.
    ///
    /// `rebuild` truncates the index first; otherwise the pass is
    /// incremental. `retry_failed` forces previously failed
    /// documents through extraction again.
    pub fn index(&mut self, rebuild: bool, retry_failed: bool) -> Result<IndexStats> {
        let _guard = SessionGuard::acquire()?;
        let tracker = Arc::new(StatusTracker::new(self.updater.clone()));
        let started = Instant::now();

        let mode = if rebuild {
            OpenMode::Truncate
        } else {
            OpenMode::Update
        };
        self.store.lock().open(mode)?;

        let pass = self.run_full_pass(&tracker, retry_failed);

        // No point checking for cancellation here, the session has
        // to be closed either way
        tracker.set_phase(Phase::Closing);
        let closed = self.store.lock().close();

        let docs_purged = pass?;
        closed?;

        self.build_spelling();

        tracker.set_phase(Phase::Done);
        let status = tracker.snapshot();
        Ok(IndexStats {
            docs_indexed: status.docs_done,
            files_seen: status.files_done,
            docs_purged,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// The phases that run with the write session open. Returns the
    /// number of purged documents.
    fn run_full_pass(&mut self, tracker: &Arc<StatusTracker>, retry_failed: bool) -> Result<usize> {
        if !tracker.set_phase(Phase::Files) {
            return Err(cancelled());
        }
        tracker.set_total_docs(self.store.lock().doc_count());

        let fsindexer = FsIndexer::new(
            &self.config.indexing,
            Arc::clone(&self.store),
            Arc::clone(tracker),
            Arc::clone(&self.extractor),
        )?;
        fsindexer.index(retry_failed)?;
        if tracker.cancelled() {
            return Err(cancelled());
        }

        if let Some(dir) = &self.config.indexing.import_dir {
            ImportQueueIndexer::new(
                dir.clone(),
                self.config.indexing.max_term_length,
                Arc::clone(&self.store),
                Arc::clone(tracker),
            )
            .index()?;
            if tracker.cancelled() {
                return Err(cancelled());
            }
        }

        // Every configured source ran to completion: entries whose
        // source no longer exists can go
        if !tracker.set_phase(Phase::Purge) {
            return Err(cancelled());
        }
        let docs_purged = self.store.lock().purge()?;
        tracker.set_total_docs(self.store.lock().doc_count());
        tracing::info!(purged = docs_purged, "purge done");

        if !tracker.set_phase(Phase::StemDb) {
            return Err(cancelled());
        }
        self.build_expansions(tracker);

        Ok(docs_purged)
    }

    /// Rebuild the stemming/folding databases over the now-stable
    /// vocabulary. Degrading: a failure disables the feature for
    /// the rest of the process.
    fn build_expansions(&mut self, tracker: &Arc<StatusTracker>) {
        if self.stem_disabled {
            tracing::debug!("expansion build disabled earlier, skipping");
            return;
        }
        tracker.note_file(&self.config.indexing.languages.join(" "));
        let builder = ExpansionBuilder::new(
            &self.config.indexing.languages,
            self.config.indexing.raw_index,
        );
        let mut store = self.store.lock();
        if let Err(e) = builder.build(&mut *store) {
            tracing::error!("expansion database build failed: {}", e.message());
            self.stem_disabled = true;
        }
    }

    /// Regenerate the spelling dictionary, best-effort, over a
    /// read-only session. Runs after the write session closed.
    fn build_spelling(&mut self) {
        let Some(speller) = &self.speller else {
            return;
        };
        if self.spell_disabled {
            return;
        }
        let result = (|| -> Result<()> {
            let mut store = self.store.lock();
            store.open(OpenMode::ReadOnly)?;
            let built = speller.build(&mut *store as &mut dyn IndexStore);
            let closed = store.close();
            built?;
            closed
        })();
        if let Err(e) = result {
            tracing::error!("spelling dictionary build failed: {}", e.message());
            self.spell_disabled = true;
        }
    }

    /// Targeted update: (re)index an explicit path list through the
    /// same per-document processing as a full pass. No purge, no
    /// expansion rebuild.
    pub fn index_files(&mut self, paths: &[PathBuf]) -> Result<IndexStats> {
        let _guard = SessionGuard::acquire()?;
        let tracker = Arc::new(StatusTracker::new(self.updater.clone()));
        let started = Instant::now();
        let myfiles = canon_sorted(paths);

        self.store.lock().open(OpenMode::Update)?;
        let result = (|| {
            if !tracker.set_phase(Phase::Files) {
                return Err(cancelled());
            }
            let fsindexer = FsIndexer::new(
                &self.config.indexing,
                Arc::clone(&self.store),
                Arc::clone(&tracker),
                Arc::clone(&self.extractor),
            )?;
            let remaining = fsindexer.index_files(&myfiles)?;
            for path in &remaining {
                // Imported documents are immutable once indexed
                tracing::debug!(path = %path.display(), "not a filesystem document, left alone");
            }
            if tracker.cancelled() {
                return Err(cancelled());
            }
            Ok(())
        })();
        let closed = self.store.lock().close();
        result?;
        closed?;

        let status = tracker.snapshot();
        Ok(IndexStats {
            docs_indexed: status.docs_done,
            files_seen: status.files_done,
            docs_purged: 0,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Update index entries for documents coming from an index
    /// query. Only filesystem-backed documents make sense here;
    /// imported documents are always up to date because they can
    /// only be added or removed, never changed in place.
    pub fn update_docs(&mut self, docs: &[DocInfo]) -> Result<IndexStats> {
        let mut files = Vec::new();
        for doc in docs {
            if doc.backend != Backend::Fs {
                continue;
            }
            match doc.url.strip_prefix("file://") {
                Some(path) => files.push(PathBuf::from(path)),
                None => {
                    tracing::error!(url = %doc.url, "filesystem backend with non-file url");
                }
            }
        }
        if files.is_empty() {
            return Ok(IndexStats::default());
        }
        self.index_files(&files)
    }

    /// Purge-only: remove index entries for an explicit path list.
    pub fn purge_files(&mut self, paths: &[PathBuf]) -> Result<usize> {
        let _guard = SessionGuard::acquire()?;
        let tracker = Arc::new(StatusTracker::new(self.updater.clone()));
        let myfiles = canon_sorted(paths);

        self.store.lock().open(OpenMode::Update)?;
        let result = (|| {
            let fsindexer = FsIndexer::new(
                &self.config.indexing,
                Arc::clone(&self.store),
                Arc::clone(&tracker),
                Arc::clone(&self.extractor),
            )?;
            fsindexer.purge_files(&myfiles)
        })();
        let closed = self.store.lock().close();
        let purged = result?;
        closed?;
        Ok(purged)
    }

    /// Report the long-running watch phase through the status
    /// channel. The real-time watcher drives per-change updates via
    /// [`Indexer::update_docs`]; this only keeps pollers informed.
    pub fn report_monitor(&self) -> bool {
        match &self.updater {
            Some(updater) => updater.update(&IndexStatus {
                phase: Phase::Monitor,
                db_total_docs: self.store.lock().doc_count(),
                ..IndexStatus::default()
            }),
            None => true,
        }
    }

    /// Shared handle on the underlying store, mainly for inspection
    /// from tests and the status command.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }
}

fn cancelled() -> FerretError {
    FerretError::Cancelled("status updater requested stop".to_string())
}
