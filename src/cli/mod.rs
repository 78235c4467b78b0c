//! CLI adapter for Ferret
//!
//! Provides the command-line interface over the indexing core. This
//! module is a thin clap adapter: all domain logic lives in `core/`.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ferret - Desktop Full-Text Indexing Engine
///
/// Crawls your document directories, keeps an inverted index up to
/// date incrementally, and maintains the stemming and folding
/// tables used to widen queries.
#[derive(Parser, Debug)]
#[command(name = "ferret")]
#[command(version)]
#[command(about = "Desktop full-text indexing engine", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (default: XDG config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an indexing pass over the configured directories
    Index(commands::IndexArgs),

    /// Index or re-index an explicit list of files
    #[command(name = "index-files")]
    IndexFiles(commands::IndexFilesArgs),

    /// Remove an explicit list of files from the index
    #[command(name = "erase-files")]
    EraseFiles(commands::EraseFilesArgs),

    /// Show the current indexing status
    Status(commands::StatusArgs),

    /// Split text into index terms (debugging aid)
    Words(commands::WordsArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  ferret completions bash > ~/.local/share/bash-completion/completions/ferret
    ///   zsh:   ferret completions zsh > ~/.zfunc/_ferret
    ///   fish:  ferret completions fish > ~/.config/fish/completions/ferret.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::xdg::XdgDirs;

    // Commands that don't need configuration
    match &cli.command {
        Commands::Completions(args) => return commands::completions::execute(args),
        Commands::Words(args) => return commands::words::execute(args),
        _ => {}
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, config, cli.format),
        Commands::IndexFiles(args) => commands::files::execute_index(args, config, cli.format),
        Commands::EraseFiles(args) => commands::files::execute_erase(args, config, cli.format),
        Commands::Status(args) => commands::status::execute(args, config, cli.format),
        Commands::Words(_) | Commands::Completions(_) => unreachable!(), // Handled above
    }
}
