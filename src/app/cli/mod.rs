//! Command line interface: argument parsing, `--since` parsing and output rendering

mod args;
mod date_parser;
mod display;

pub use args::{Args, OutputFormat};
pub use date_parser::{parse_since, DateParseError};
pub use display::{render_consumer_table, render_report_json, render_report_table};
