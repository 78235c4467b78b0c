//! Query-expansion table builder.
//!
//! Runs once per full pass, after the main index is stable, and
//! rebuilds the synonym families used to widen queries: one
//! stemming family per configured language and, when the index
//! keeps terms raw (case and diacritics preserved), per-language
//! unaccented-stem families plus a single diacritics/case folding
//! family shared by all languages.
//!
//! The vocabulary is streamed from the store in sorted order, a
//! page at a time, so memory stays bounded no matter how large the
//! index is. Prefixed field terms, CJK terms and terms that do not
//! look like natural language words are skipped.

use crate::core::error::Result;
use crate::core::split::is_cjk;
use crate::core::store::{is_field_term, IndexStore, FAM_DIACASE, FAM_STEM, FAM_STEM_UNAC};
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Vocabulary page size for the streaming pass.
const PAGE_SIZE: usize = 256;

/// Member name of the folding family, which is language independent.
const DIACASE_MEMBER: &str = "all";

/// Counters reported after a build.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpansionStats {
    pub terms_seen: usize,
    pub edges_added: usize,
}

/// Builds the stemming and folding expansion databases.
pub struct ExpansionBuilder {
    languages: Vec<String>,
    raw_index: bool,
}

impl ExpansionBuilder {
    pub fn new(languages: &[String], raw_index: bool) -> Self {
        Self {
            languages: languages.to_vec(),
            raw_index,
        }
    }

    /// (Re)build every expansion family over the store's current
    /// vocabulary. Families for languages no longer configured are
    /// deleted first; rebuilding with an unchanged vocabulary and
    /// language list is idempotent.
    pub fn build<S: IndexStore + ?Sized>(&self, store: &mut S) -> Result<ExpansionStats> {
        let stemmers = self.resolve_stemmers();
        tracing::info!(
            languages = ?stemmers.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>(),
            raw_index = self.raw_index,
            "rebuilding expansion databases"
        );

        self.drop_stale_members(store)?;
        for (lang, _) in &stemmers {
            store.recreate_member(FAM_STEM, lang)?;
            if self.raw_index {
                store.recreate_member(FAM_STEM_UNAC, lang)?;
            }
        }
        if self.raw_index {
            store.recreate_member(FAM_DIACASE, DIACASE_MEMBER)?;
        } else {
            store.delete_member(FAM_DIACASE, DIACASE_MEMBER)?;
        }

        let mut stats = ExpansionStats::default();
        let mut cursor: Option<String> = None;
        loop {
            let page = store.terms_from(cursor.as_deref(), PAGE_SIZE);
            let Some(last) = page.last().cloned() else {
                break;
            };
            for term in &page {
                stats.terms_seen += 1;
                if is_field_term(term) {
                    continue;
                }
                if term.chars().next().map(is_cjk).unwrap_or(true) {
                    // Western stemming rules don't apply to CJK
                    continue;
                }

                // On a raw index the case-folded term is the stemmer
                // input, and the folded form expands back to the
                // cased/accented one at query time
                let folded = if self.raw_index {
                    term.to_lowercase()
                } else {
                    term.clone()
                };
                if self.raw_index && folded != *term {
                    store.add_synonym(FAM_DIACASE, DIACASE_MEMBER, &folded, term)?;
                    stats.edges_added += 1;
                }

                if !store.is_spelling_candidate(term) {
                    continue;
                }

                for (lang, stemmer) in &stemmers {
                    let stem = stemmer.stem(&folded).into_owned();
                    store.add_synonym(FAM_STEM, lang, &stem, &folded)?;
                    stats.edges_added += 1;

                    if self.raw_index {
                        // Stemming the unaccented variant may be
                        // linguistically wrong, but it is what makes
                        // diacritics-insensitive search work on a
                        // raw index
                        let unac = strip_accents(&folded);
                        if unac != folded {
                            let ustem = stemmer.stem(&unac).into_owned();
                            store.add_synonym(FAM_STEM_UNAC, lang, &ustem, &unac)?;
                            stats.edges_added += 1;
                        }
                    }
                }
            }
            cursor = Some(last);
        }

        tracing::info!(
            terms = stats.terms_seen,
            edges = stats.edges_added,
            "expansion databases rebuilt"
        );
        Ok(stats)
    }

    /// Map configured language names to Snowball stemmers. Unknown
    /// languages are skipped with a warning; they must not abort the
    /// pass.
    fn resolve_stemmers(&self) -> Vec<(String, Stemmer)> {
        self.languages
            .iter()
            .filter_map(|lang| match algorithm_for(lang) {
                Some(algorithm) => Some((lang.clone(), Stemmer::create(algorithm))),
                None => {
                    tracing::warn!(%lang, "no stemmer for language, skipping");
                    None
                }
            })
            .collect()
    }

    /// Delete families built for languages no longer configured.
    fn drop_stale_members<S: IndexStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        for family in [FAM_STEM, FAM_STEM_UNAC] {
            for member in store.family_members(family) {
                if !self.languages.iter().any(|l| l == &member) {
                    tracing::info!(family, language = %member, "dropping stale stem database");
                    store.delete_member(family, &member)?;
                }
            }
        }
        Ok(())
    }
}

/// Case/diacritics removal used for the unaccented stem input:
/// decompose, drop combining marks.
pub fn strip_accents(term: &str) -> String {
    term.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn algorithm_for(lang: &str) -> Option<Algorithm> {
    match lang.to_ascii_lowercase().as_str() {
        "arabic" => Some(Algorithm::Arabic),
        "danish" => Some(Algorithm::Danish),
        "dutch" => Some(Algorithm::Dutch),
        "english" => Some(Algorithm::English),
        "finnish" => Some(Algorithm::Finnish),
        "french" => Some(Algorithm::French),
        "german" => Some(Algorithm::German),
        "greek" => Some(Algorithm::Greek),
        "hungarian" => Some(Algorithm::Hungarian),
        "italian" => Some(Algorithm::Italian),
        "norwegian" => Some(Algorithm::Norwegian),
        "portuguese" => Some(Algorithm::Portuguese),
        "romanian" => Some(Algorithm::Romanian),
        "russian" => Some(Algorithm::Russian),
        "spanish" => Some(Algorithm::Spanish),
        "swedish" => Some(Algorithm::Swedish),
        "tamil" => Some(Algorithm::Tamil),
        "turkish" => Some(Algorithm::Turkish),
        _ => None,
    }
}
