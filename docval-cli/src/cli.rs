use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use docval::{Document, Severity, ValidationConfig, ValidationReport, Validator, document, output};

use crate::logging;

#[derive(Parser, Debug)]
#[command(name = "docval", version, about = "Validate markdown documents against configured rules")]
pub struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the configured checks and print the report
    Validate {
        /// Configuration file (JSON, or YAML when named *.yaml / *.yml)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory or file to validate, overriding `baseDirectory`
        #[arg(short, long)]
        path: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
    },
    /// Parse a single document and print its properties and text
    Parse {
        #[arg(long)]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = DocumentFormat::Json)]
        format: DocumentFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
    Csv,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

/// What the process should report to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// The report status was `Error` or `Failure`.
    Blocked,
}

/// Load a [`ValidationConfig`] from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ValidationConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_saphyr::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse YAML config {}: {e}", path.display())
        })
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config {}", path.display()))
    }
}

/// Run the `validate` command, writing the report to `out`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, validation
/// aborts, or the report cannot be written.
pub fn validate(
    config_path: &Path,
    path: Option<&Path>,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<ValidationReport> {
    let mut config = load_config(config_path)?;
    if let Some(path) = path {
        config.base_directory = path.to_path_buf();
    }
    tracing::debug!(
        config = %config_path.display(),
        base = %config.base_directory.display(),
        checks = config.checks.len(),
        "loaded configuration"
    );

    let report = Validator::new().validate(&config)?;
    match format {
        ReportFormat::Json => output::write_json(&report, out)?,
        ReportFormat::Yaml => output::write_yaml(&report, out)?,
        ReportFormat::Csv => output::write_csv(&report, out)?,
        ReportFormat::Text => output::write_human(&report, out)?,
    }
    Ok(report)
}

/// Run the `parse` command, writing the document to `out`.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or written.
pub fn parse(file: &Path, format: DocumentFormat, out: &mut dyn Write) -> Result<Document> {
    let document = document::load(file)
        .with_context(|| format!("Failed to read document {}", file.display()))?;
    match format {
        DocumentFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
        }
        DocumentFormat::Yaml => {
            let yaml = serde_saphyr::to_string(&document).map_err(|e| anyhow::anyhow!("{e}"))?;
            write!(out, "{yaml}")?;
        }
    }
    Ok(document)
}

fn colored_status(status: Severity) -> ColoredString {
    match status {
        Severity::Success => status.as_str().green(),
        Severity::Info => status.as_str().cyan(),
        Severity::Warn => status.as_str().yellow(),
        Severity::Error | Severity::Failure => status.as_str().red().bold(),
    }
}

/// One-line colored summary of a finished run.
#[must_use]
pub fn status_line(report: &ValidationReport) -> String {
    let summary = report.summary();
    format!(
        "docval: {} ({} files, {} failures, {} errors, {} warnings)",
        colored_status(report.status()),
        summary.file_count,
        summary.failures,
        summary.errors,
        summary.warnings
    )
}

/// Parse arguments, install logging and dispatch the subcommand.
///
/// # Errors
///
/// Returns an error if the selected command fails.
pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        tracing::debug!(error = %err, "keeping existing tracing subscriber");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Validate {
            config,
            path,
            format,
        } => {
            let report = validate(&config, path.as_deref(), format, &mut out)?;
            out.flush()?;
            eprintln!("{}", status_line(&report));
            Ok(if report.status().is_blocking() {
                Outcome::Blocked
            } else {
                Outcome::Passed
            })
        }
        Commands::Parse { file, format } => {
            parse(&file, format, &mut out)?;
            Ok(Outcome::Passed)
        }
    }
}
