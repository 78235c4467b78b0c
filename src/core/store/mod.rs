//! Abstract index store contract.
//!
//! The real inverted-index engine (posting lists, document data,
//! on-disk format) is an external collaborator. The indexing core
//! only relies on the narrow contract defined here: an exclusive
//! open/close/write-session discipline, per-document term insertion,
//! purge of entries whose source is gone, sorted vocabulary
//! streaming, and synonym-family bookkeeping for the expansion
//! builder.
//!
//! At most one write session may be open process-wide at a time;
//! that invariant is enforced by the orchestrator, not here.

pub mod mem;

pub use mem::MemStore;

use crate::core::error::Result;
use crate::core::types::{Backend, DocInfo, Term};

/// Session mode for [`IndexStore::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Truncate and rebuild from scratch
    Truncate,
    /// Incremental update
    Update,
    ReadOnly,
}

/// Synonym family holding per-language stemming expansions.
pub const FAM_STEM: &str = "stem";
/// Stemming expansions computed over unaccented input, kept only for
/// raw (case/diacritics preserving) indexes.
pub const FAM_STEM_UNAC: &str = "stemunac";
/// The single diacritics/case folding family shared by all
/// languages.
pub const FAM_DIACASE: &str = "dica";

/// Wrap a field-specific term (title, author, ...) so it stays out
/// of the free-text namespace.
pub fn wrap_field_term(field: &str, term: &str) -> String {
    format!(":{}:{}", field.to_ascii_uppercase(), term)
}

/// True for internal/prefixed field terms, which vocabulary
/// consumers must skip.
pub fn is_field_term(term: &str) -> bool {
    term.starts_with(':')
}

/// The abstract key/term store the indexing core writes into.
pub trait IndexStore: Send {
    /// Open a session. Opening an already-open store is an error.
    fn open(&mut self, mode: OpenMode) -> Result<()>;

    /// Close the current session, persisting whatever the backend
    /// persists. Failure aborts the indexing pass.
    fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Total number of documents known to the index.
    fn doc_count(&self) -> usize;

    /// Up-to-date check for one document, by signature.
    ///
    /// Returns `false` when the stored signature matches and the
    /// document can be skipped; the document is then marked as
    /// existing so a later [`IndexStore::purge`] keeps it. A
    /// document recorded as failed keeps reporting "up to date"
    /// until `retry_failed` forces it through again.
    fn need_update(&mut self, udi: &str, sig: &str, retry_failed: bool) -> bool;

    /// Insert or replace one document and its terms.
    fn add_or_update(&mut self, info: DocInfo, terms: Vec<Term>) -> Result<()>;

    /// Record a document whose extraction failed, so unchanged
    /// failed files are not retried on every pass.
    fn note_failed(&mut self, udi: &str, sig: &str) -> Result<()>;

    /// Remove one document. Returns whether it existed.
    fn delete_document(&mut self, udi: &str) -> Result<bool>;

    /// Which sub-indexer owns the given document, if known.
    fn doc_backend(&self, udi: &str) -> Option<Backend>;

    /// Remove every entry not seen since the session opened, i.e.
    /// whose source no longer exists. Returns the number purged.
    fn purge(&mut self) -> Result<usize>;

    /// Stream the vocabulary in sorted order: return up to `limit`
    /// terms strictly greater than `cursor` (or from the start when
    /// `cursor` is `None`). Memory stays bounded regardless of
    /// vocabulary size.
    fn terms_from(&self, cursor: Option<&str>, limit: usize) -> Vec<String>;

    /// The store's judgment of whether a term looks like a natural
    /// language word worth stemming or spell-checking.
    fn is_spelling_candidate(&self, term: &str) -> bool {
        let nchars = term.chars().count();
        if nchars < 2 || term.len() >= 50 || is_field_term(term) {
            return false;
        }
        !term
            .chars()
            .any(|c| c.is_ascii_digit() || matches!(c, '*' | '?' | '[' | ']'))
    }

    /// Create or empty one synonym family member.
    fn recreate_member(&mut self, family: &str, member: &str) -> Result<()>;

    /// Drop one synonym family member entirely.
    fn delete_member(&mut self, family: &str, member: &str) -> Result<()>;

    /// Enumerate the members of a family (e.g. the languages with a
    /// stem database).
    fn family_members(&self, family: &str) -> Vec<String>;

    /// Add one expansion edge `key -> value` to a family member.
    fn add_synonym(&mut self, family: &str, member: &str, key: &str, value: &str) -> Result<()>;

    /// Look up the expansion edges registered under `key`, sorted.
    fn synonyms(&self, family: &str, member: &str, key: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;
    impl IndexStore for Dummy {
        fn open(&mut self, _mode: OpenMode) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn is_open(&self) -> bool {
            false
        }
        fn doc_count(&self) -> usize {
            0
        }
        fn need_update(&mut self, _udi: &str, _sig: &str, _retry: bool) -> bool {
            true
        }
        fn add_or_update(&mut self, _info: DocInfo, _terms: Vec<Term>) -> Result<()> {
            Ok(())
        }
        fn note_failed(&mut self, _udi: &str, _sig: &str) -> Result<()> {
            Ok(())
        }
        fn delete_document(&mut self, _udi: &str) -> Result<bool> {
            Ok(false)
        }
        fn doc_backend(&self, _udi: &str) -> Option<Backend> {
            None
        }
        fn purge(&mut self) -> Result<usize> {
            Ok(0)
        }
        fn terms_from(&self, _cursor: Option<&str>, _limit: usize) -> Vec<String> {
            Vec::new()
        }
        fn recreate_member(&mut self, _f: &str, _m: &str) -> Result<()> {
            Ok(())
        }
        fn delete_member(&mut self, _f: &str, _m: &str) -> Result<()> {
            Ok(())
        }
        fn family_members(&self, _f: &str) -> Vec<String> {
            Vec::new()
        }
        fn add_synonym(&mut self, _f: &str, _m: &str, _k: &str, _v: &str) -> Result<()> {
            Ok(())
        }
        fn synonyms(&self, _f: &str, _m: &str, _k: &str) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_field_term_wrapping() {
        let t = wrap_field_term("title", "report");
        assert_eq!(t, ":TITLE:report");
        assert!(is_field_term(&t));
        assert!(!is_field_term("report"));
    }

    #[test]
    fn test_spelling_candidate_default() {
        let store = Dummy;
        assert!(store.is_spelling_candidate("hello"));
        assert!(store.is_spelling_candidate("déjà"));
        assert!(!store.is_spelling_candidate("a"));
        assert!(!store.is_spelling_candidate("x86"));
        assert!(!store.is_spelling_candidate(":TITLE:report"));
        assert!(!store.is_spelling_candidate(&"y".repeat(60)));
        assert!(!store.is_spelling_candidate("wild*card"));
    }
}
