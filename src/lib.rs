//! ngffmeta: versioned OME-NGFF multiscale metadata.
//!
//! Models the multiscale metadata of three NGFF schema revisions (0.4, 0.5
//! and 0.6) as strongly typed values, and converts between them. Adjacent
//! revisions convert directly; 0.4 and 0.6 are bridged through 0.5.
//!
//! # Modules
//!
//! - [`model`]: Per-revision metadata types and JSON document I/O
//! - [`conversion`]: The version router and conversion reports
//! - [`validation`]: Full-document validation with an issue report
//! - [`version`]: Schema revision identifiers
//! - [`error`]: Error types for ngffmeta operations

pub mod conversion;
pub mod error;
pub mod model;
pub mod validation;
pub mod version;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use conversion::{ConversionReport, Converted};
pub use error::NgffError;
pub use model::{AnyMetadata, NgffMetadata};
pub use version::NgffVersion;

/// The ngffmeta CLI application.
#[derive(Parser)]
#[command(name = "ngffmeta")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a metadata document to another NGFF version.
    Convert(ConvertArgs),
    /// Validate a metadata document for errors and warnings.
    Validate(ValidateArgs),
}

/// Report rendering for both subcommands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input metadata document (JSON with a `version` field).
    input: PathBuf,

    /// Target version ('0.4', '0.5', '0.6', 'v05', 'latest', ...).
    #[arg(long = "to", env = "NGFFMETA_TARGET_VERSION")]
    to: String,

    /// Output file. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Proceed even if the conversion drops information.
    #[arg(long)]
    allow_lossy: bool,

    /// Format of the conversion report printed to stderr.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(clap::Args)]
struct ValidateArgs {
    /// Input metadata document to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Run the ngffmeta CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), NgffError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Validate(args)) => run_validate(args),
        None => {
            println!("ngffmeta {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("OME-NGFF multiscale metadata converter (0.4, 0.5, 0.6).");
            println!();
            println!("Run 'ngffmeta --help' for usage information.");
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), NgffError> {
    let metadata = model::io_json::read_metadata_json(&args.input)?;
    let converted = metadata.to_version_named(&args.to)?;
    let report = &converted.report;

    match args.report {
        ReportFormat::Text => {
            eprintln!(
                "Converted {} from NGFF {} to {}:",
                args.input.display(),
                report.from,
                report.to
            );
            eprint!("{}", report);
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report).map_err(|source| {
                NgffError::JsonWrite {
                    path: PathBuf::from("<stderr>"),
                    source,
                }
            })?;
            eprintln!("{}", json);
        }
    }

    let converted = if args.allow_lossy {
        converted
    } else {
        converted.reject_lossy()?
    };

    match &args.output {
        Some(path) => model::io_json::write_metadata_json(path, &converted.value)?,
        None => {
            let json = model::io_json::to_json_string(&converted.value).map_err(|source| {
                NgffError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ValidationSummary<'a> {
    version: NgffVersion,
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

fn run_validate(args: ValidateArgs) -> Result<(), NgffError> {
    let metadata = model::io_json::read_metadata_json_unchecked(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_metadata(&metadata, &opts);

    match args.output {
        ReportFormat::Json => {
            let summary = ValidationSummary {
                version: metadata.version(),
                error_count: report.error_count(),
                warning_count: report.warning_count(),
                issues: &report.issues,
            };
            let json = serde_json::to_string_pretty(&summary).map_err(|source| {
                NgffError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        ReportFormat::Text => {
            print!("{}", report);
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(NgffError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}
