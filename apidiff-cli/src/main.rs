//! apidiff CLI - Structural diff for OpenAPI 3 documents
//!
//! Compares a base and a revision document, loaded from files or URLs, and
//! prints what changed as YAML, JSON, a markdown changelog or an HTML page.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use apidiff_core::{compare, Config, Empty};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod load;
mod output;
mod stats;

use config::{ApidiffConfig, DiffSettings};
use load::Source;
use output::{OutputConfig, OutputError, OutputFormat, Outputter};
use stats::{RunStats, Stage};

const EXIT_DIFF_FOUND: u8 = 1;
const EXIT_INVALID_FLAGS: u8 = 101;

/// Structural diff and breaking-change detection for OpenAPI 3 documents.
#[derive(Parser)]
#[command(name = "apidiff")]
#[command(author, version)]
#[command(about = "Structural diff and breaking-change detection for OpenAPI 3 documents")]
#[command(
    long_about = "apidiff compares two OpenAPI 3 documents and reports every added,\ndeleted and modified element, resolving $refs and recursive schemas.\n\nDefaults can be set in .apidiff.toml in the working directory."
)]
#[command(next_help_heading = "Options")]
#[command(after_help = "Examples:
  apidiff -b v1.yaml -r v2.yaml                    Full diff as YAML
  apidiff -b v1.yaml -r v2.yaml --format text      Markdown changelog
  apidiff -b v1.yaml -r v2.yaml --breaking-only    Breaking changes only
  apidiff -b v1.json -r v2.json --summary          Counts per section
  apidiff -b https://example.com/openapi.json -r openapi.json --fail-on-diff")]
pub struct Cli {
    /// Base document (file path or http(s) URL)
    #[arg(short, long)]
    base: String,

    /// Revision document (file path or http(s) URL)
    #[arg(short, long)]
    revision: String,

    /// Prefix stripped from revision paths before matching
    #[arg(long)]
    prefix: Option<String>,

    /// Only compare paths matching this regular expression
    #[arg(long)]
    filter: Option<String>,

    /// Skip paths and operations with an extension matching this regular expression
    #[arg(long)]
    filter_extension: Option<String>,

    /// Ignore changes to examples
    #[arg(long)]
    exclude_examples: bool,

    /// Ignore changes to descriptions and summaries
    #[arg(long)]
    exclude_description: bool,

    /// Print per-section counts instead of the full diff
    #[arg(long)]
    summary: bool,

    /// Keep only breaking changes
    #[arg(long)]
    breaking_only: bool,

    /// Output format (overrides config default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Exit with status 1 when a difference is found
    #[arg(long)]
    fail_on_diff: bool,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// A failed run, one variant per exit status.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("failed to load base document: {0:#}")]
    LoadBase(anyhow::Error),

    #[error("failed to load revision document: {0:#}")]
    LoadRevision(anyhow::Error),

    #[error(transparent)]
    Diff(#[from] apidiff_core::Error),

    #[error("failed to render summary: {0}")]
    Summary(OutputError),

    #[error("failed to render diff: {0}")]
    Render(OutputError),

    #[error("{0} (set in {file})", file = config::CONFIG_FILE)]
    UnsupportedFormat(String),
}

impl RunError {
    fn exit_code(&self) -> u8 {
        match self {
            RunError::LoadBase(_) => 102,
            RunError::LoadRevision(_) => 103,
            RunError::Diff(_) => 104,
            RunError::Summary(_) => 105,
            RunError::Render(e) if e.is_report() => 107,
            RunError::Render(_) => 106,
            RunError::UnsupportedFormat(_) => 108,
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Merge command-line flags over the `[diff]` settings from `.apidiff.toml`.
fn diff_config(cli: &Cli, settings: &DiffSettings) -> apidiff_core::Result<Config> {
    let mut config = Config::new();
    if cli.exclude_examples || settings.exclude_examples {
        config = config.excluding_examples();
    }
    if cli.exclude_description || settings.exclude_description {
        config = config.excluding_descriptions();
    }
    if cli.breaking_only || settings.breaking_only {
        config = config.breaking_changes_only();
    }
    if let Some(pattern) = cli.filter.as_deref().or(settings.filter.as_deref()) {
        config = config.with_path_filter(pattern)?;
    }
    if let Some(pattern) = cli
        .filter_extension
        .as_deref()
        .or(settings.filter_extension.as_deref())
    {
        config = config.with_extension_filter(pattern)?;
    }
    if let Some(prefix) = cli.prefix.as_deref().or(settings.prefix.as_deref()) {
        config = config.with_path_prefix(prefix);
    }
    Ok(config)
}

/// Run one comparison. Returns whether a difference was found.
async fn run(
    cli: &Cli,
    base: &Source,
    revision: &Source,
    stats: &mut RunStats,
) -> Result<bool, RunError> {
    let settings = ApidiffConfig::load(Path::new("."));

    // Resolve output format: CLI flag > config default > YAML
    let format = match (cli.format, settings.default_format()) {
        (Some(format), _) => format,
        (None, Some(name)) => name
            .parse::<OutputFormat>()
            .map_err(RunError::UnsupportedFormat)?,
        (None, None) => OutputFormat::default(),
    };
    let output_config = OutputConfig::auto_detect_with_color_override(format, settings.use_color());
    colored::control::set_override(output_config.use_colors());

    let config = diff_config(cli, &settings.diff)?;
    tracing::debug!(?format, summary = cli.summary, "configuration resolved");

    let started = Instant::now();
    let base_document = load::load(base).await.map_err(RunError::LoadBase)?;
    stats.record(Stage::LoadBase, started);

    let started = Instant::now();
    let revision_document = load::load(revision).await.map_err(RunError::LoadRevision)?;
    stats.record(Stage::LoadRevision, started);

    let started = Instant::now();
    let diff = compare(&config, &base_document, &revision_document);
    stats.record(Stage::Diff, started);
    stats.diff_empty = Some(diff.is_empty());

    let rendered = if cli.summary {
        let started = Instant::now();
        let summary = diff.summary();
        let rendered = summary.render(&output_config).map_err(RunError::Summary)?;
        stats.record(Stage::Summary, started);
        rendered
    } else {
        let started = Instant::now();
        let rendered = diff.render(&output_config).map_err(RunError::Render)?;
        stats.record(Stage::Render, started);
        rendered
    };
    println!("{}", rendered.trim_end());

    Ok(!diff.is_empty())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported through the same path
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_FLAGS)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    setup_logging(cli.verbose, cli.quiet);

    let base = Source::parse(&cli.base);
    let revision = Source::parse(&cli.revision);
    let mut stats = RunStats::new(&base, &revision);

    let status = match run(&cli, &base, &revision, &mut stats).await {
        Ok(true) if cli.fail_on_diff => EXIT_DIFF_FOUND,
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };

    stats.finish(status);
    ExitCode::from(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["apidiff", "-b", "base.yaml", "-r", "revision.yaml"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_requires_both_documents() {
        assert!(Cli::try_parse_from(["apidiff", "-b", "base.yaml"]).is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = DiffSettings {
            filter: Some("^/v1/".to_string()),
            prefix: Some("/api".to_string()),
            ..Default::default()
        };
        let config = diff_config(&cli(&["--filter", "^/v2/"]), &settings).unwrap();
        assert_eq!(config.path_filter().map(|re| re.as_str()), Some("^/v2/"));
        assert_eq!(config.path_prefix(), Some("/api"));
    }

    #[test]
    fn test_settings_switch_on_flags() {
        let settings = DiffSettings {
            breaking_only: true,
            ..Default::default()
        };
        let config = diff_config(&cli(&[]), &settings).unwrap();
        assert!(config.breaking_only);
    }

    #[test]
    fn test_invalid_filter() {
        let err =
            diff_config(&cli(&["--filter-extension", "("]), &DiffSettings::default()).unwrap_err();
        assert_eq!(RunError::from(err).exit_code(), 104);
    }

    #[test]
    fn test_exit_codes() {
        let report = RunError::Render(OutputError::Report(std::fmt::Error));
        assert_eq!(report.exit_code(), 107);
        let unsupported = RunError::UnsupportedFormat("Unknown output format: 'pdf'".to_string());
        assert_eq!(unsupported.exit_code(), 108);
        assert!(unsupported.to_string().ends_with("(set in .apidiff.toml)"));
    }
}
