//! Domain data structures shared across the indexing pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One indexed token: the term text, its word-count ordinal within
/// the document, and the byte span it covers in the source text.
///
/// Terms are not globally unique; a document yields an ordered
/// sequence with strictly increasing positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub text: String,
    /// Word-count ordinal within the document
    pub pos: usize,
    /// Byte offset of the first byte of the term in the source text
    pub bstart: usize,
    /// Byte offset one past the last byte of the term
    pub bend: usize,
}

impl Term {
    pub fn new(text: impl Into<String>, pos: usize, bstart: usize, bend: usize) -> Self {
        Self {
            text: text.into(),
            pos,
            bstart,
            bend,
        }
    }
}

/// Which sub-indexer a document belongs to.
///
/// Filesystem documents can be re-interned from their path at any
/// time. Imported documents came through the queued-import spool and
/// are immutable once indexed; targeted filesystem updates skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    Fs,
    Import,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Fs => write!(f, "FS"),
            Backend::Import => write!(f, "IMPORT"),
        }
    }
}

/// Everything the store keeps about one document besides its terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocInfo {
    /// Unique document identifier (canonical path for filesystem
    /// documents, `import:<name>` for queued imports)
    pub udi: String,
    /// Canonical URL, `file://...` for filesystem documents
    pub url: String,
    /// Declared or sniffed media type
    pub mime: String,
    /// Up-to-date signature (mtime + size for filesystem documents)
    pub sig: String,
    pub backend: Backend,
    /// Extracted metadata: title, author, ...
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl DocInfo {
    /// Build the DocInfo skeleton for a filesystem document.
    pub fn for_file(path: &Path, sig: impl Into<String>) -> Self {
        let canon = path.to_string_lossy().into_owned();
        Self {
            udi: canon.clone(),
            url: format!("file://{canon}"),
            mime: String::new(),
            sig: sig.into(),
            backend: Backend::Fs,
            meta: BTreeMap::new(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").map(String::as_str)
    }
}

/// Statistics reported after an indexing pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    pub docs_indexed: usize,
    pub files_seen: usize,
    pub docs_purged: usize,
    pub duration_ms: u64,
}

/// Compute the up-to-date signature for a filesystem path.
///
/// Mirrors what the store compares in `need_update`: modification
/// time and size, so either change forces a re-index.
pub fn file_sig(path: &Path) -> std::io::Result<String> {
    let meta = std::fs::metadata(path)?;
    let mtime = meta
        .modified()?
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok(format!("{}:{}", mtime, meta.len()))
}

/// Canonicalize a path for use as a document identifier.
pub fn path_canon(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_new() {
        let t = Term::new("hello", 0, 0, 5);
        assert_eq!(t.text, "hello");
        assert_eq!(t.pos, 0);
        assert_eq!((t.bstart, t.bend), (0, 5));
    }

    #[test]
    fn test_docinfo_for_file() {
        let info = DocInfo::for_file(Path::new("/tmp/a.txt"), "12:34");
        assert_eq!(info.udi, "/tmp/a.txt");
        assert_eq!(info.url, "file:///tmp/a.txt");
        assert_eq!(info.backend, Backend::Fs);
        assert_eq!(info.sig, "12:34");
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Fs.to_string(), "FS");
        assert_eq!(Backend::Import.to_string(), "IMPORT");
    }

    #[test]
    fn test_file_sig_changes_with_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "one").unwrap();
        let s1 = file_sig(&path).unwrap();
        std::fs::write(&path, "longer content").unwrap();
        let s2 = file_sig(&path).unwrap();
        assert_ne!(s1, s2);
    }
}
