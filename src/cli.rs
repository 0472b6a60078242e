//! Command-line argument parsing for the batch converter
//!
//! Supports:
//! - Scanning files and printing the converted text
//! - Rewriting files in place
//! - Pointing at an explicit config file

use clap::Parser;
use std::path::PathBuf;

/// Convert interpolated string literals to template strings
#[derive(Parser, Debug)]
#[command(
    name = "tickwrap",
    version,
    about = "Convert quoted strings carrying ${...} interpolation to template strings"
)]
pub struct CliArgs {
    /// Files to scan
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Rewrite files in place instead of printing to stdout
    #[arg(short, long)]
    pub write: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
