//! Indexing status reporting.
//!
//! The orchestrator and its workers are the single writer of an
//! [`IndexStatus`] record; external pollers (a front-end, the
//! `status` CLI command) read it from a small key/value side file at
//! their own pace. A reader hitting a torn write simply tries
//! again: the file is rewritten whole after every meaningful
//! transition.
//!
//! The [`StatusUpdater`] return value doubles as a cancellation
//! channel: returning `false` asks the pass to stop.

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Phase of the indexing state machine.
///
/// One-shot passes go `None → Files → Purge → StemDb → Closing →
/// Done`; a long-running real-time watcher sits in `Monitor`
/// instead of running a one-shot `Files` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    None,
    Files,
    Purge,
    StemDb,
    Closing,
    Monitor,
    Done,
}

impl Phase {
    /// Stable integer code written to the status file.
    pub fn code(self) -> u8 {
        match self {
            Phase::None => 0,
            Phase::Files => 1,
            Phase::Purge => 2,
            Phase::StemDb => 3,
            Phase::Closing => 4,
            Phase::Monitor => 5,
            Phase::Done => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Phase::None),
            1 => Some(Phase::Files),
            2 => Some(Phase::Purge),
            3 => Some(Phase::StemDb),
            4 => Some(Phase::Closing),
            5 => Some(Phase::Monitor),
            6 => Some(Phase::Done),
            _ => None,
        }
    }
}

/// Snapshot of indexing progress.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub phase: Phase,
    /// Current file or, during `StemDb`, the language being built
    pub fname: String,
    /// Documents actually (re)indexed this pass
    pub docs_done: usize,
    /// Candidate files examined by the crawler
    pub files_done: usize,
    /// Total documents known to the index
    pub db_total_docs: usize,
}

impl Default for IndexStatus {
    fn default() -> Self {
        Self {
            phase: Phase::None,
            fname: String::new(),
            docs_done: 0,
            files_done: 0,
            db_total_docs: 0,
        }
    }
}

/// Receives status snapshots; returning `false` cancels the pass.
pub trait StatusUpdater: Send + Sync {
    fn update(&self, status: &IndexStatus) -> bool;
}

/// Shared progress state: single conceptual writer (the pass),
/// updated from the crawler and the worker pool, forwarded to an
/// optional [`StatusUpdater`].
pub struct StatusTracker {
    status: Mutex<IndexStatus>,
    updater: Option<std::sync::Arc<dyn StatusUpdater>>,
    cancelled: AtomicBool,
}

impl StatusTracker {
    pub fn new(updater: Option<std::sync::Arc<dyn StatusUpdater>>) -> Self {
        Self {
            status: Mutex::new(IndexStatus::default()),
            updater,
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Raise the external stop signal; checked by the crawler
    /// between documents and by phase transitions.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> IndexStatus {
        self.status.lock().clone()
    }

    /// Enter a new phase. Returns `false` when the pass should stop.
    pub fn set_phase(&self, phase: Phase) -> bool {
        self.publish(|status| {
            status.phase = phase;
            status.fname.clear();
        })
    }

    /// Report the file (or language) currently being worked on.
    pub fn note_file(&self, name: &str) -> bool {
        self.publish(|status| {
            status.fname.clear();
            status.fname.push_str(name);
            status.files_done += 1;
        })
    }

    /// One document finished (indexed, or skipped recoverably).
    pub fn note_doc_done(&self) -> bool {
        self.publish(|status| status.docs_done += 1)
    }

    pub fn set_total_docs(&self, total: usize) -> bool {
        self.publish(|status| status.db_total_docs = total)
    }

    fn publish<F: FnOnce(&mut IndexStatus)>(&self, mutate: F) -> bool {
        let snapshot = {
            let mut status = self.status.lock();
            mutate(&mut status);
            status.clone()
        };
        if let Some(updater) = &self.updater {
            if !updater.update(&snapshot) {
                self.cancel();
            }
        }
        !self.cancelled()
    }
}

/// Writes the status record to a key/value text file for external
/// pollers.
pub struct FileStatusSink {
    path: PathBuf,
}

impl FileStatusSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatusUpdater for FileStatusSink {
    fn update(&self, status: &IndexStatus) -> bool {
        if let Err(e) = write_status_file(&self.path, status) {
            // A dead status channel is not a reason to stop indexing
            tracing::warn!(path = %self.path.display(), "status write failed: {e}");
        }
        true
    }
}

fn write_status_file(path: &Path, status: &IndexStatus) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut f = fs::File::create(&tmp)?;
        writeln!(f, "phase = {}", status.phase.code())?;
        writeln!(f, "fn = {}", status.fname)?;
        writeln!(f, "docsdone = {}", status.docs_done)?;
        writeln!(f, "filesdone = {}", status.files_done)?;
        writeln!(f, "dbtotdocs = {}", status.db_total_docs)?;
    }
    fs::rename(&tmp, path)
}

/// Parse a status file written by [`FileStatusSink`].
///
/// Returns `None` for a missing or torn file; pollers should treat
/// that as "try again".
pub fn read_status_file(path: &Path) -> Option<IndexStatus> {
    let raw = fs::read_to_string(path).ok()?;
    let mut status = IndexStatus::default();
    let mut have_phase = false;
    for line in raw.lines() {
        let (key, value) = line.split_once('=')?;
        let (key, value) = (key.trim(), value.trim());
        match key {
            "phase" => {
                status.phase = Phase::from_code(value.parse().ok()?)?;
                have_phase = true;
            }
            "fn" => status.fname = value.to_string(),
            "docsdone" => status.docs_done = value.parse().ok()?,
            "filesdone" => status.files_done = value.parse().ok()?,
            "dbtotdocs" => status.db_total_docs = value.parse().ok()?,
            _ => {}
        }
    }
    have_phase.then_some(status)
}
