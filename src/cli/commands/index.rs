//! Index command - run a full or incremental indexing pass

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::index::{FileStatusSink, Indexer};
use crate::core::store::MemStore;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Erase the whole index and rebuild from scratch
    #[arg(long, short = 'z')]
    pub rebuild: bool,

    /// Retry documents whose extraction previously failed
    #[arg(long, short = 'k')]
    pub retry_failed: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub docs_indexed: usize,
    pub files_seen: usize,
    pub docs_purged: usize,
    pub duration_secs: f64,
}

/// Execute the index command
pub fn execute(
    args: IndexArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.quiet && format == OutputFormat::Human {
        let what = if args.rebuild { "Rebuilding" } else { "Updating" };
        eprintln!(
            "{what} index in {}...",
            colors::file_path(&config.storage.db_dir.display().to_string())
        );
    }

    let store = MemStore::new(&config.storage.db_dir);
    let sink = Arc::new(FileStatusSink::new(config.status.file.clone()));
    let mut indexer = Indexer::new(config, store, Some(sink));

    let stats = indexer.index(args.rebuild, args.retry_failed)?;

    let response = IndexResponse {
        docs_indexed: stats.docs_indexed,
        files_seen: stats.files_seen,
        docs_purged: stats.docs_purged,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents ({} files seen, {} purged) in {}",
                colors::success("Indexed"),
                colors::number(&response.docs_indexed.to_string()),
                colors::number(&response.files_seen.to_string()),
                colors::number(&response.docs_purged.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
