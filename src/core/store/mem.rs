//! In-process reference implementation of the index store contract.
//!
//! `MemStore` keeps everything in sorted maps and persists a JSON
//! snapshot of the whole index in the database directory when a
//! write session closes. It implements only the abstract contract
//! the indexing core relies on; a production posting-list engine
//! would live behind the same trait.

use crate::core::error::{FerretError, Result};
use crate::core::store::{IndexStore, OpenMode};
use crate::core::types::{Backend, DocInfo, Term};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::ops::Bound;
use std::path::{Path, PathBuf};

const SNAPSHOT_NAME: &str = "ferret-index.json";

/// One stored document: its metadata record plus the unique terms it
/// contributed to the vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocRecord {
    info: DocInfo,
    terms: Vec<String>,
}

/// family -> member -> key -> expansion values
type Families = BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeSet<String>>>>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    docs: BTreeMap<String, DocRecord>,
    /// term -> number of documents carrying it
    vocab: BTreeMap<String, u64>,
    families: Families,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// In-memory index store with JSON snapshot persistence.
pub struct MemStore {
    /// Snapshot file; `None` keeps the store ephemeral (tests)
    path: Option<PathBuf>,
    data: Snapshot,
    /// Documents seen since the session opened; survivors of purge
    seen: HashSet<String>,
    mode: Option<OpenMode>,
}

impl MemStore {
    /// Store persisting its snapshot under `db_dir`.
    pub fn new(db_dir: &Path) -> Self {
        Self {
            path: Some(db_dir.join(SNAPSHOT_NAME)),
            data: Snapshot::default(),
            seen: HashSet::new(),
            mode: None,
        }
    }

    /// Purely in-memory store, nothing touches the filesystem.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            data: Snapshot::default(),
            seen: HashSet::new(),
            mode: None,
        }
    }

    fn check_open(&self) -> Result<()> {
        if self.mode.is_none() {
            return Err(FerretError::StorageError("store is not open".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        match self.mode {
            None => Err(FerretError::StorageError("store is not open".to_string())),
            Some(OpenMode::ReadOnly) => Err(FerretError::StorageError(
                "store is open read-only".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    fn load(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !path.exists() {
            self.data = Snapshot::default();
            return Ok(());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| FerretError::StorageError(format!("cannot read {}: {e}", path.display())))?;
        self.data = serde_json::from_str(&raw)
            .map_err(|e| FerretError::StorageError(format!("corrupt snapshot {}: {e}", path.display())))?;
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        self.data.updated_at = Some(Utc::now());
        let raw = serde_json::to_string(&self.data)?;
        // Write-then-rename keeps pollers from seeing a torn file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &path)
            .map_err(|e| FerretError::StorageError(format!("cannot persist snapshot: {e}")))?;
        Ok(())
    }

    fn drop_doc_terms(vocab: &mut BTreeMap<String, u64>, record: &DocRecord) {
        for term in &record.terms {
            if let Some(count) = vocab.get_mut(term) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    vocab.remove(term);
                }
            }
        }
    }

    fn remove_doc(&mut self, udi: &str) -> bool {
        match self.data.docs.remove(udi) {
            Some(record) => {
                Self::drop_doc_terms(&mut self.data.vocab, &record);
                true
            }
            None => false,
        }
    }
}

impl IndexStore for MemStore {
    fn open(&mut self, mode: OpenMode) -> Result<()> {
        if self.mode.is_some() {
            return Err(FerretError::StorageError(
                "a session is already open on this store".to_string(),
            ));
        }
        if mode == OpenMode::Truncate {
            self.data = Snapshot::default();
        } else {
            self.load()?;
        }
        self.seen.clear();
        self.mode = Some(mode);
        tracing::debug!(?mode, docs = self.data.docs.len(), "store session opened");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.check_open()?;
        if self.mode != Some(OpenMode::ReadOnly) {
            self.persist()?;
        }
        self.mode = None;
        self.seen.clear();
        tracing::debug!("store session closed");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    fn doc_count(&self) -> usize {
        self.data.docs.len()
    }

    fn need_update(&mut self, udi: &str, sig: &str, retry_failed: bool) -> bool {
        let Some(record) = self.data.docs.get(udi) else {
            return true;
        };
        let stored = record.info.sig.as_str();
        let up_to_date = match stored.strip_suffix('+') {
            // Previously failed: unchanged means "leave it alone"
            // unless a retry was requested
            Some(base) => base == sig && !retry_failed,
            None => stored == sig,
        };
        if up_to_date {
            self.seen.insert(udi.to_string());
        }
        !up_to_date
    }

    fn add_or_update(&mut self, info: DocInfo, terms: Vec<Term>) -> Result<()> {
        self.check_writable()?;
        self.remove_doc(&info.udi);

        let unique: BTreeSet<String> = terms.into_iter().map(|t| t.text).collect();
        for term in &unique {
            *self.data.vocab.entry(term.clone()).or_insert(0) += 1;
        }
        self.seen.insert(info.udi.clone());
        self.data.docs.insert(
            info.udi.clone(),
            DocRecord {
                info,
                terms: unique.into_iter().collect(),
            },
        );
        Ok(())
    }

    fn note_failed(&mut self, udi: &str, sig: &str) -> Result<()> {
        self.check_writable()?;
        self.remove_doc(udi);
        let mut info = DocInfo::for_file(Path::new(udi), format!("{sig}+"));
        info.udi = udi.to_string();
        self.seen.insert(udi.to_string());
        self.data.docs.insert(
            udi.to_string(),
            DocRecord {
                info,
                terms: Vec::new(),
            },
        );
        Ok(())
    }

    fn delete_document(&mut self, udi: &str) -> Result<bool> {
        self.check_writable()?;
        self.seen.remove(udi);
        Ok(self.remove_doc(udi))
    }

    fn doc_backend(&self, udi: &str) -> Option<Backend> {
        self.data.docs.get(udi).map(|r| r.info.backend)
    }

    fn purge(&mut self) -> Result<usize> {
        self.check_writable()?;
        let stale: Vec<String> = self
            .data
            .docs
            .keys()
            .filter(|udi| !self.seen.contains(*udi))
            .cloned()
            .collect();
        for udi in &stale {
            tracing::debug!(%udi, "purging entry with no matching source");
            self.remove_doc(udi);
        }
        Ok(stale.len())
    }

    fn terms_from(&self, cursor: Option<&str>, limit: usize) -> Vec<String> {
        let lower = match cursor {
            Some(c) => Bound::Excluded(c.to_string()),
            None => Bound::Unbounded,
        };
        self.data
            .vocab
            .range((lower, Bound::Unbounded))
            .take(limit)
            .map(|(term, _)| term.clone())
            .collect()
    }

    fn recreate_member(&mut self, family: &str, member: &str) -> Result<()> {
        self.check_writable()?;
        self.data
            .families
            .entry(family.to_string())
            .or_default()
            .insert(member.to_string(), BTreeMap::new());
        Ok(())
    }

    fn delete_member(&mut self, family: &str, member: &str) -> Result<()> {
        self.check_writable()?;
        if let Some(members) = self.data.families.get_mut(family) {
            members.remove(member);
            if members.is_empty() {
                self.data.families.remove(family);
            }
        }
        Ok(())
    }

    fn family_members(&self, family: &str) -> Vec<String> {
        self.data
            .families
            .get(family)
            .map(|members| members.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn add_synonym(&mut self, family: &str, member: &str, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.data
            .families
            .entry(family.to_string())
            .or_default()
            .entry(member.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .insert(value.to_string());
        Ok(())
    }

    fn synonyms(&self, family: &str, member: &str, key: &str) -> Vec<String> {
        self.data
            .families
            .get(family)
            .and_then(|members| members.get(member))
            .and_then(|keys| keys.get(key))
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }
}
