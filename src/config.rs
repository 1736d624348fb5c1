//! Command line configuration.

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Input path meaning standard input.
const STDIN_MARKER: &str = "-";

/// Title used when none is given and input is read from stdin.
const DEFAULT_TITLE: &str = "Untitled";

/// Command line configuration for wikirender.
#[derive(Debug, Clone, Parser)]
#[command(name = "wikirender", version, about, long_about = None)]
pub struct Config {
    /// Markdown file to render (stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page title for standalone output (defaults to input file name)
    #[arg(long)]
    pub title: Option<String>,

    /// Wrap rendered HTML in a complete document
    #[arg(long)]
    pub standalone: bool,

    /// Stylesheet linked from standalone output (repeatable)
    #[arg(long = "stylesheet", value_name = "HREF")]
    pub stylesheets: Vec<String>,

    /// Leave wiki link targets unencoded
    #[arg(long)]
    pub no_wiki_links: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file does not exist, or a title or
    /// stylesheet is given without `--standalone`.
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = self.input_path() {
            if !input.is_file() {
                bail!("Input file does not exist: {}", input.display());
            }
        }

        if !self.standalone && (self.title.is_some() || !self.stylesheets.is_empty()) {
            bail!("--title and --stylesheet require --standalone");
        }

        Ok(())
    }

    /// Returns input file path, or None when reading stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != STDIN_MARKER)
    }

    /// Returns title for standalone output.
    ///
    /// Uses the explicit title, then the input file stem, then "Untitled".
    pub fn page_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }

        self.input_path()
            .and_then(|path| path.file_stem())
            .and_then(|stem| stem.to_str())
            .map(String::from)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Returns maximum log level for the verbosity flag count.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
