//! Command line arguments

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Statistics output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "reposcan")]
#[command(about = "Scan an artifact repository and dispatch its content to consumers")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Repository directory to scan
    #[arg(value_name = "REPO", required_unless_present = "list_consumers")]
    pub repository: Option<PathBuf>,

    /// Repository id (defaults to an id derived from the path)
    #[arg(long = "repository-id", value_name = "ID")]
    pub repository_id: Option<String>,

    /// Known content consumers to run*
    #[arg(
        short = 'k',
        long = "consumers",
        value_name = "IDS",
        value_delimiter = ',',
        action = ArgAction::Append
    )]
    pub consumers: Vec<String>,

    /// Invalid content consumers to run*
    #[arg(
        short = 'i',
        long = "invalid-consumers",
        value_name = "IDS",
        value_delimiter = ',',
        action = ArgAction::Append
    )]
    pub invalid_consumers: Vec<String>,

    /// Only treat files modified since this time as new
    #[arg(
        short = 'S',
        long = "since",
        value_name = "DATE_TIME",
        help = "Incremental scan marker \
                (YYYY-MM-DD, RFC 3339, or relative: 'yesterday', '2 days ago')"
    )]
    pub since: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Statistics output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the artifact listing to a file instead of stdout
    #[arg(long = "listing-file", value_name = "FILE")]
    pub listing_file: Option<PathBuf>,

    /// Report auto-remove candidates without deleting them
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// List registered consumers and exit
    #[arg(long = "list-consumers")]
    pub list_consumers: bool,

    /// Force colored output
    #[arg(long = "color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Resolve color use: explicit flags win, otherwise color only on a terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        (self.color || is_terminal) && !self.no_color
    }
}
