//! Status command - show the current indexing status

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::index::{read_status_file, Phase};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Execute the status command
pub fn execute(
    _args: StatusArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // A missing or torn status file just means "no pass in
    // progress, or try again"
    let Some(status) = read_status_file(&config.status.file) else {
        match format {
            OutputFormat::Human => println!("No indexing status available"),
            OutputFormat::Json => println!("null"),
        }
        return Ok(());
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::label("Phase:"),
                phase_name(status.phase)
            );
            if !status.fname.is_empty() {
                println!("{} {}", colors::label("Current:"), status.fname);
            }
            println!(
                "{} {}",
                colors::label("Documents done:"),
                colors::number(&status.docs_done.to_string())
            );
            println!(
                "{} {}",
                colors::label("Files seen:"),
                colors::number(&status.files_done.to_string())
            );
            println!(
                "{} {}",
                colors::label("Total in index:"),
                colors::number(&status.db_total_docs.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::None => "idle",
        Phase::Files => "indexing files",
        Phase::Purge => "purging stale entries",
        Phase::StemDb => "building expansion databases",
        Phase::Closing => "closing",
        Phase::Monitor => "monitoring",
        Phase::Done => "done",
    }
}
