//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific CLI command.

pub mod completions;
pub mod files;
pub mod index;
pub mod status;
pub mod words;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use files::{EraseFilesArgs, IndexFilesArgs};
pub use index::IndexArgs;
pub use status::StatusArgs;
pub use words::WordsArgs;
