//! Application startup
//!
//! Parses the command line, initialises logging from the command line and
//! the configuration file (command line wins), then either lists consumers
//! or runs a scan on a blocking task with ctrl-c wired to cancellation.

use crate::app::cli::{self, Args, OutputFormat};
use crate::app::runner::{list_consumers, run_scan, AppError, ScanInvocation, ScanOutcome};
use crate::config::{load_configuration, Configuration, LoggingSettings};
use crate::consumer::builtin::{BuiltinOptions, ListingFormat};
use crate::core::cancellation::CancellationToken;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, LogFormat};
use crate::scanner::{ScanMode, ScanReport, ScanState};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

/// Exit code used when a scan was interrupted
const EXIT_CANCELLED: u8 = 130;

pub async fn startup() -> ExitCode {
    let args = Args::parse();
    let use_color = args.use_color(std::io::stdout().is_terminal());

    let loaded = load_configuration(args.config_file.as_deref());
    let file_logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    if let Err(e) = start_logging(&args, &file_logging, use_color) {
        eprintln!("reposcan: {}", e);
        return ExitCode::FAILURE;
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return ExitCode::FAILURE;
        }
    };

    if args.list_consumers {
        return match list_consumers(config) {
            Ok(descriptors) => {
                print!("{}", cli::render_consumer_table(&descriptors, use_color));
                ExitCode::SUCCESS
            }
            Err(e) => {
                log_error_with_context(&e, "Listing consumers");
                ExitCode::FAILURE
            }
        };
    }

    match scan(&args, config).await {
        Ok(outcome) => report(&args, &outcome, use_color),
        Err(e) => {
            log_error_with_context(&e, "Repository scan");
            if let AppError::Scan(scan_error) = &e {
                if let Some(partial) = scan_error.partial_report() {
                    print_report(&args, partial, use_color);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn start_logging(
    args: &Args,
    file_logging: &LoggingSettings,
    use_color: bool,
) -> Result<(), crate::core::logging::LoggingError> {
    let level = args.log_level.clone().or_else(|| file_logging.level.clone());
    let format = match args.log_format.as_deref().or(file_logging.format.as_deref()) {
        Some(format) => format.parse::<LogFormat>()?,
        None => LogFormat::default(),
    };
    let file = args
        .log_file
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .or_else(|| file_logging.file.clone());

    init_logging(level.as_deref(), format, file.as_deref(), use_color)
}

fn invocation(args: &Args) -> Result<ScanInvocation, AppError> {
    let repository = args.repository.clone().unwrap_or_else(|| ".".into());
    let mode = match &args.since {
        Some(since) => ScanMode::Incremental {
            since: cli::parse_since(since)?,
        },
        None => ScanMode::Fresh,
    };
    let listing_format = match args.format {
        OutputFormat::Table => ListingFormat::Text,
        OutputFormat::Json => ListingFormat::Json,
    };

    Ok(ScanInvocation {
        repository,
        repository_id: args.repository_id.clone(),
        known_consumers: args.consumers.clone(),
        invalid_consumers: args.invalid_consumers.clone(),
        mode,
        builtin: BuiltinOptions {
            listing_format,
            listing_file: args.listing_file.clone(),
            auto_remove_dry_run: args.dry_run,
        },
    })
}

async fn scan(args: &Args, config: Configuration) -> Result<ScanOutcome, AppError> {
    let invocation = invocation(args)?;
    let token = CancellationToken::new();
    let ctrl_c = token.cancel_on_ctrl_c();

    let result = tokio::task::spawn_blocking(move || run_scan(config, invocation, token)).await;
    ctrl_c.abort();

    result.map_err(|e| AppError::Task(e.to_string()))?
}

fn print_report(args: &Args, report: &ScanReport, use_color: bool) -> bool {
    match args.format {
        OutputFormat::Table => print!("{}", cli::render_report_table(report, use_color)),
        OutputFormat::Json => match cli::render_report_json(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Unable to serialise scan report: {}", e);
                return false;
            }
        },
    }
    true
}

fn report(args: &Args, outcome: &ScanOutcome, use_color: bool) -> ExitCode {
    if !print_report(args, &outcome.report, use_color) {
        return ExitCode::FAILURE;
    }

    match outcome.report.state {
        ScanState::Cancelled => ExitCode::from(EXIT_CANCELLED),
        _ => ExitCode::SUCCESS,
    }
}
