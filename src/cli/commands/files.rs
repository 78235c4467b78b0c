//! index-files / erase-files commands - targeted updates and purges

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::index::{FileStatusSink, Indexer};
use crate::core::store::MemStore;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the index-files command
#[derive(Args, Debug)]
pub struct IndexFilesArgs {
    /// Files to (re)index
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the erase-files command
#[derive(Args, Debug)]
pub struct EraseFilesArgs {
    /// Files to remove from the index
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FilesResponse {
    docs_indexed: usize,
    docs_erased: usize,
}

fn make_indexer(config: Config) -> Indexer<MemStore> {
    let store = MemStore::new(&config.storage.db_dir);
    let sink = Arc::new(FileStatusSink::new(config.status.file.clone()));
    Indexer::new(config, store, Some(sink))
}

/// Execute the index-files command
pub fn execute_index(
    args: IndexFilesArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut indexer = make_indexer(config);
    let stats = indexer.index_files(&args.paths)?;

    let response = FilesResponse {
        docs_indexed: stats.docs_indexed,
        docs_erased: 0,
    };
    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents",
                colors::success("Indexed"),
                colors::number(&response.docs_indexed.to_string())
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }
    Ok(())
}

/// Execute the erase-files command
pub fn execute_erase(
    args: EraseFilesArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut indexer = make_indexer(config);
    let erased = indexer.purge_files(&args.paths)?;

    let response = FilesResponse {
        docs_indexed: 0,
        docs_erased: erased,
    };
    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents from the index",
                colors::success("Erased"),
                colors::number(&response.docs_erased.to_string())
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }
    Ok(())
}
