//! Ferret - Desktop Full-Text Indexing Engine
//!
//! Walks a document corpus, extracts and tokenizes text, and
//! maintains an inverted-index store incrementally, including the
//! synonym tables used to widen queries (stemming, diacritics/case
//! folding). Built for workstation search: correctness under
//! partial failure (crashes mid-scan, malformed encodings, changing
//! filesystem state) and throughput over large personal corpora
//! matter more than distributed scale.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (front-end agnostic)
//!   - split (tokenizer), queue (bounded worker pool)
//!   - index (orchestrator, sub-indexers, status)
//!   - expand (stemming/folding expansion databases)
//!   - store (abstract index store + reference backend)
//!   - config, error, types, extract, xdg
//!
//! - **cli**: Command-line adapter (depends on core)

// Core domain logic (front-end agnostic)
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{FerretError, Result};
pub use core::index::{Indexer, Phase};
pub use core::split::{SplitMode, TermSink, TextSplit};
pub use core::store::{IndexStore, MemStore, OpenMode};
pub use core::types::*;
