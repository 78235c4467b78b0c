//! Text extraction collaborator.
//!
//! Per-format document converters (mail parsers, office formats,
//! mime sniffers) live behind the [`TextExtractor`] trait: given a
//! document locator they produce plain text plus a metadata mapping,
//! or a failure. The orchestrator treats any failure as "skip this
//! document, keep going".
//!
//! The built-in [`PlainTextExtractor`] handles plain text files and
//! rejects anything that does not decode as UTF-8, which makes the
//! whole document a recoverable skip.

use crate::core::error::{FerretError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Plain text plus extracted metadata for one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDoc {
    pub text: String,
    /// title, author, ... whatever the converter could recover
    pub meta: BTreeMap<String, String>,
    /// Declared or sniffed media type
    pub mime: String,
}

/// Converts one document into indexable text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedDoc>;
}

/// Extractor for plain text files.
///
/// The file name (without extension) doubles as the document title
/// when the content does not provide one.
#[derive(Debug, Default, Clone)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDoc> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| {
            FerretError::ExtractionFailed(format!("not valid UTF-8: {}", path.display()))
        })?;

        let mut meta = BTreeMap::new();
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            meta.insert("title".to_string(), stem.to_string());
        }

        Ok(ExtractedDoc {
            text,
            meta,
            mime: mime_for_path(path).to_string(),
        })
    }
}

/// Cheap media type guess from the file extension. Real sniffing
/// belongs to external converters.
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("html" | "htm") => "text/html",
        Some("md") => "text/markdown",
        Some("xml") => "text/xml",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}
