//! Filesystem sub-indexer.
//!
//! Crawls the configured top directories and pushes one task per
//! candidate document onto a bounded work queue drained by a fixed
//! worker pool. Workers extract text, tokenize it and write terms
//! into the shared store session. A single document failing to
//! extract or tokenize is skipped; the pass continues and the
//! progress counters still advance.

use crate::core::config::IndexingConfig;
use crate::core::error::Result;
use crate::core::extract::TextExtractor;
use crate::core::index::status::StatusTracker;
use crate::core::queue::WorkQueue;
use crate::core::split::{SplitMode, TermAccumulator, TextSplit};
use crate::core::store::{wrap_field_term, IndexStore};
use crate::core::types::{file_sig, path_canon, Backend, DocInfo, Term};
use glob::Pattern;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// One document awaiting indexing: created by the crawler, consumed
/// exactly once by a worker, never retried automatically.
#[derive(Debug, Clone)]
pub struct DocTask {
    pub path: PathBuf,
    pub udi: String,
    pub sig: String,
    pub backend: Backend,
}

/// Crawl + per-document tokenize/store over the filesystem source.
pub struct FsIndexer<S: IndexStore + 'static> {
    config: IndexingConfig,
    store: Arc<Mutex<S>>,
    tracker: Arc<StatusTracker>,
    extractor: Arc<dyn TextExtractor>,
    skipped_names: Vec<Pattern>,
    skipped_paths: Vec<Pattern>,
}

impl<S: IndexStore + 'static> FsIndexer<S> {
    pub fn new(
        config: &IndexingConfig,
        store: Arc<Mutex<S>>,
        tracker: Arc<StatusTracker>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Result<Self> {
        let skipped_names = compile_patterns(&config.skipped_names)?;
        let skipped_paths = compile_patterns(&config.skipped_paths)?;
        Ok(Self {
            config: config.clone(),
            store,
            tracker,
            extractor,
            skipped_names,
            skipped_paths,
        })
    }

    /// Full crawl of the configured top directories.
    ///
    /// Cancellation is observed between documents through the
    /// tracker; this returns `Ok` in that case and the caller
    /// decides what a stopped pass means.
    pub fn index(&self, retry_failed: bool) -> Result<()> {
        let queue = WorkQueue::<DocTask>::new("fsindexer", self.config.queue_depth);
        self.start_workers(&queue);

        let max_bytes = (self.config.max_file_size_mb as u64) * 1024 * 1024;
        'crawl: for topdir in &self.config.topdirs {
            // Canonical crawl roots keep udis identical with the
            // ones targeted updates compute from canonicalized paths
            let topdir = path_canon(topdir);
            tracing::info!(dir = %topdir.display(), "crawling");
            let walker = WalkDir::new(&topdir)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| !self.skipped(e.path()));
            for entry in walker {
                if self.tracker.cancelled() {
                    break 'crawl;
                }
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("walk error: {e}");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Ok(meta) = entry.metadata() {
                    if meta.len() > max_bytes {
                        tracing::debug!(path = %entry.path().display(), "skipping large file");
                        continue;
                    }
                }
                if !self
                    .tracker
                    .note_file(&entry.path().display().to_string())
                {
                    break 'crawl;
                }
                let Some(task) = self.make_task(entry.path(), retry_failed) else {
                    continue;
                };
                if !queue.put(task) {
                    tracing::error!("work queue refused task, stopping crawl");
                    break 'crawl;
                }
            }
        }

        // Queued tasks drain before the pass can move on
        queue.shutdown();
        Ok(())
    }

    /// Targeted update: push the given (already canonicalized,
    /// sorted) paths through the same per-document processing as a
    /// full pass. Documents owned by another backend are immutable
    /// here; they are returned for their own sub-indexer to handle.
    pub fn index_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut remaining = Vec::new();
        for path in paths {
            if self.tracker.cancelled() {
                break;
            }
            let udi = path.to_string_lossy().into_owned();
            if let Some(backend) = self.store.lock().doc_backend(&udi) {
                if backend != Backend::Fs {
                    remaining.push(path.clone());
                    continue;
                }
            }
            if !self.tracker.note_file(&udi) {
                break;
            }
            match self.make_explicit_task(path) {
                Some(task) => {
                    self.process_task(&task);
                }
                None => tracing::warn!(path = %path.display(), "cannot stat, skipping"),
            }
        }
        Ok(remaining)
    }

    /// Purge-only counterpart of [`FsIndexer::index_files`]: remove
    /// rather than (re)insert entries for the given paths.
    pub fn purge_files(&self, paths: &[PathBuf]) -> Result<usize> {
        let mut purged = 0;
        for path in paths {
            let udi = path.to_string_lossy().into_owned();
            if self.store.lock().delete_document(&udi)? {
                purged += 1;
                tracing::debug!(%udi, "erased from index");
            }
        }
        Ok(purged)
    }

    fn start_workers(&self, queue: &WorkQueue<DocTask>) {
        let store = Arc::clone(&self.store);
        let tracker = Arc::clone(&self.tracker);
        let extractor = Arc::clone(&self.extractor);
        let max_term_length = self.config.max_term_length;
        queue.start(self.config.worker_count, move |task: DocTask| {
            process_document(
                &store,
                &tracker,
                extractor.as_ref(),
                max_term_length,
                &task,
            )
        });
    }

    fn process_task(&self, task: &DocTask) {
        process_document(
            &self.store,
            &self.tracker,
            self.extractor.as_ref(),
            self.config.max_term_length,
            task,
        );
    }

    /// Build the task for a crawled path, or `None` when the stored
    /// signature says it is up to date.
    fn make_task(&self, path: &Path, retry_failed: bool) -> Option<DocTask> {
        let sig = match file_sig(path) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot stat: {e}");
                return None;
            }
        };
        let udi = path.to_string_lossy().into_owned();
        if !self.store.lock().need_update(&udi, &sig, retry_failed) {
            return None;
        }
        Some(DocTask {
            path: path.to_path_buf(),
            udi,
            sig,
            backend: Backend::Fs,
        })
    }

    /// Explicitly requested paths are always reprocessed.
    fn make_explicit_task(&self, path: &Path) -> Option<DocTask> {
        let sig = file_sig(path).ok()?;
        Some(DocTask {
            path: path.to_path_buf(),
            udi: path.to_string_lossy().into_owned(),
            sig,
            backend: Backend::Fs,
        })
    }

    fn skipped(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if self.skipped_names.iter().any(|p| p.matches(name)) {
                return true;
            }
        }
        if !self.skipped_paths.is_empty() {
            let full = path.to_string_lossy();
            if self.skipped_paths.iter().any(|p| p.matches(&full)) {
                return true;
            }
        }
        false
    }
}

/// Worker body: extract, tokenize, store. Returns `false` only on a
/// fatal per-worker condition (the store refusing writes), which
/// deregisters this worker without tearing down the pool.
fn process_document<S: IndexStore>(
    store: &Arc<Mutex<S>>,
    tracker: &Arc<StatusTracker>,
    extractor: &dyn TextExtractor,
    max_term_length: usize,
    task: &DocTask,
) -> bool {
    let doc = match extractor.extract(&task.path) {
        Ok(doc) => doc,
        Err(e) => {
            // Recoverable: skip the document, remember the failure
            // so an unchanged file is not retried every pass
            tracing::warn!(path = %task.path.display(), "extraction failed: {e}");
            if let Err(e) = store.lock().note_failed(&task.udi, &task.sig) {
                tracing::error!("cannot record failed document: {e}");
                return false;
            }
            tracker.note_doc_done();
            return true;
        }
    };

    let splitter = TextSplit::with_max_term_length(SplitMode::Index, max_term_length);
    let mut acc = TermAccumulator::default();
    splitter.split(&doc.text, &mut acc);
    let mut terms = acc.terms;

    // Field terms go into their own namespace so vocabulary
    // consumers can tell them from free text
    if let Some(title) = doc.meta.get("title") {
        let mut title_acc = TermAccumulator::default();
        splitter.split(title, &mut title_acc);
        terms.extend(title_acc.terms.into_iter().map(|t| {
            Term::new(wrap_field_term("title", &t.text), t.pos, t.bstart, t.bend)
        }));
    }

    let mut info = DocInfo::for_file(&task.path, task.sig.clone());
    info.udi = task.udi.clone();
    info.backend = task.backend;
    info.mime = doc.mime;
    info.meta = doc.meta;

    if let Err(e) = store.lock().add_or_update(info, terms) {
        tracing::error!(path = %task.path.display(), "store write failed: {e}");
        return false;
    }
    tracker.note_doc_done();
    true
}

fn compile_patterns(globs: &[String]) -> Result<Vec<Pattern>> {
    globs
        .iter()
        .map(|g| {
            Pattern::new(g).map_err(|e| {
                crate::core::error::FerretError::ConfigError(format!(
                    "invalid skip pattern '{g}': {e}"
                ))
            })
        })
        .collect()
}

/// Canonicalize and sort an explicit path list the way targeted
/// operations expect it.
pub fn canon_sorted(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = paths.iter().map(|p| path_canon(p)).collect();
    out.sort();
    out
}
