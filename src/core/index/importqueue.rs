//! Queued-import sub-indexer.
//!
//! Secondary document source: a spool directory where external
//! tools (a browser plugin, a mail hook) drop plain content files,
//! each optionally accompanied by a `<name>.meta` JSON sidecar
//! carrying metadata (url, title, mime). A full pass drains the
//! spool after the filesystem pass. Imported documents carry the
//! `IMPORT` backend tag and are immutable from the filesystem
//! side; they live as long as their spool entry does.

use crate::core::error::Result;
use crate::core::index::status::StatusTracker;
use crate::core::split::{SplitMode, TermAccumulator, TextSplit};
use crate::core::store::{wrap_field_term, IndexStore};
use crate::core::types::{file_sig, Backend, DocInfo, Term};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const META_SUFFIX: &str = "meta";

/// Drains the import spool directory into the shared store session.
pub struct ImportQueueIndexer<S: IndexStore + 'static> {
    dir: PathBuf,
    max_term_length: usize,
    store: Arc<Mutex<S>>,
    tracker: Arc<StatusTracker>,
}

impl<S: IndexStore + 'static> ImportQueueIndexer<S> {
    pub fn new(
        dir: PathBuf,
        max_term_length: usize,
        store: Arc<Mutex<S>>,
        tracker: Arc<StatusTracker>,
    ) -> Self {
        Self {
            dir,
            max_term_length,
            store,
            tracker,
        }
    }

    /// Index every spool entry that changed since the last pass.
    pub fn index(&self) -> Result<()> {
        if !self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "import spool absent, nothing to do");
            return Ok(());
        }
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("import spool read error: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || is_sidecar(&path) || is_hidden(&path) {
                continue;
            }
            entries.push(path);
        }
        entries.sort();

        for path in entries {
            if self.tracker.cancelled() {
                break;
            }
            if !self.tracker.note_file(&path.display().to_string()) {
                break;
            }
            if let Err(e) = self.index_entry(&path) {
                // Per-item failures don't stop the drain
                tracing::warn!(path = %path.display(), "import failed: {e}");
            }
        }
        Ok(())
    }

    fn index_entry(&self, path: &Path) -> Result<()> {
        let udi = import_udi(path);
        let sig = file_sig(path)?;
        if !self.store.lock().need_update(&udi, &sig, false) {
            return Ok(());
        }

        let bytes = fs::read(path)?;
        let Ok(text) = String::from_utf8(bytes) else {
            tracing::warn!(path = %path.display(), "import entry is not UTF-8, skipped");
            self.store.lock().note_failed(&udi, &sig)?;
            self.tracker.note_doc_done();
            return Ok(());
        };
        let meta = read_sidecar(path);

        let splitter = TextSplit::with_max_term_length(SplitMode::Index, self.max_term_length);
        let mut acc = TermAccumulator::default();
        splitter.split(&text, &mut acc);
        let mut terms = acc.terms;
        if let Some(title) = meta.get("title") {
            let mut title_acc = TermAccumulator::default();
            splitter.split(title, &mut title_acc);
            terms.extend(
                title_acc
                    .terms
                    .into_iter()
                    .map(|t| Term::new(wrap_field_term("title", &t.text), t.pos, t.bstart, t.bend)),
            );
        }

        let url = meta
            .get("url")
            .cloned()
            .unwrap_or_else(|| format!("file://{}", path.display()));
        let mime = meta
            .get("mime")
            .cloned()
            .unwrap_or_else(|| "text/plain".to_string());
        let info = DocInfo {
            udi: udi.clone(),
            url,
            mime,
            sig,
            backend: Backend::Import,
            meta,
        };
        self.store.lock().add_or_update(info, terms)?;
        self.tracker.note_doc_done();
        Ok(())
    }
}

fn is_sidecar(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(META_SUFFIX)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(true)
}

/// Stable identifier of a spool entry, distinct from any filesystem
/// path udi.
fn import_udi(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("import:{name}")
}

fn read_sidecar(path: &Path) -> BTreeMap<String, String> {
    let sidecar = path.with_extension(META_SUFFIX);
    let Ok(raw) = fs::read_to_string(&sidecar) else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&raw) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!(path = %sidecar.display(), "bad sidecar metadata: {e}");
            BTreeMap::new()
        }
    }
}
