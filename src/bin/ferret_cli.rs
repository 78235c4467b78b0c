//! Ferret CLI - Command-line interface for the Ferret indexing engine
//!
//! # Examples
//!
//! ```bash
//! # Incremental indexing pass over the configured directories
//! ferret index
//!
//! # Wipe and rebuild the whole index
//! ferret index --rebuild
//!
//! # Re-index a couple of files right now
//! ferret index-files ~/notes/todo.txt ~/notes/ideas.txt
//!
//! # What is the indexer doing?
//! ferret status
//! ```

use clap::Parser;
use ferret::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
