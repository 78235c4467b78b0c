//! Words command - dump the tokenizer output for a file or stdin

use crate::core::split::{SplitMode, TermSink, TextSplit};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

/// Arguments for the words command
#[derive(Args, Debug)]
pub struct WordsArgs {
    /// File to split; reads stdin when absent or "-"
    pub file: Option<PathBuf>,

    /// Split in query mode (only final spans, no constituent words)
    #[arg(long, short = 'q')]
    pub query: bool,
}

struct PrintingSink {
    first: bool,
}

impl TermSink for PrintingSink {
    fn take_word(&mut self, term: &str, pos: usize, bstart: usize, bend: usize) -> bool {
        if self.first {
            println!("{:>4} {:<24} {:>6} {:>6}", "pos", "term", "bs", "be");
            self.first = false;
        }
        println!("{pos:>4} {term:<24} {bstart:>6} {bend:>6}");
        true
    }
}

/// Execute the words command
pub fn execute(args: &WordsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &args.file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mode = if args.query {
        SplitMode::Query
    } else {
        SplitMode::Index
    };
    let mut sink = PrintingSink { first: true };
    TextSplit::new(mode).split(&text, &mut sink);
    Ok(())
}
