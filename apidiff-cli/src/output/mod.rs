//! Output formatting module for the apidiff CLI
//!
//! Renders a diff or a summary as YAML, JSON, a markdown text report, or
//! that same report as a standalone HTML page.

use clap::ValueEnum;
use serde::Serialize;
use std::io::IsTerminal;
use std::str::FromStr;

use apidiff_core::{Diff, Summary};

mod html;
mod json;
mod text;
mod yaml;

pub use self::html::HtmlOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;
pub use self::yaml::YamlOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML diff tree (default)
    #[default]
    Yaml,
    /// JSON diff tree
    Json,
    /// Markdown changelog
    Text,
    /// HTML changelog
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "text" | "markdown" | "md" => Ok(OutputFormat::Text),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Failure to produce output.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report generation failed")]
    Report(#[from] std::fmt::Error),
}

impl OutputError {
    /// Whether the failure happened while writing the text/HTML report
    /// rather than serializing the tree.
    pub fn is_report(&self) -> bool {
        matches!(self, OutputError::Report(_))
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// The output format to use
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with the specified format
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
        }
    }

    /// Create an OutputConfig with TTY detection and an optional color override.
    pub fn auto_detect_with_color_override(
        format: OutputFormat,
        color_override: Option<bool>,
    ) -> Self {
        let use_color = color_override.unwrap_or_else(|| std::io::stdout().is_terminal());
        Self {
            no_color: !use_color,
            ..Self::new(format)
        }
    }

    /// Check if colors should be used
    pub fn use_colors(&self) -> bool {
        !self.no_color
    }
}

/// Types that can be rendered in every supported format.
pub trait Outputter: Serialize + Sized {
    /// Render as a markdown report.
    fn to_text(&self) -> Result<String, std::fmt::Error>;

    fn to_yaml(&self) -> Result<String, OutputError> {
        Ok(YamlOutput::format(self)?)
    }

    fn to_json(&self) -> Result<String, OutputError> {
        Ok(JsonOutput::format(self)?)
    }

    fn to_html(&self) -> Result<String, OutputError> {
        Ok(HtmlOutput::render(&self.to_text()?))
    }

    /// Render using the format specified in config
    fn render(&self, config: &OutputConfig) -> Result<String, OutputError> {
        match config.format {
            OutputFormat::Yaml => self.to_yaml(),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Text => Ok(self.to_text()?),
            OutputFormat::Html => self.to_html(),
        }
    }
}

impl Outputter for Diff {
    fn to_text(&self) -> Result<String, std::fmt::Error> {
        TextOutput::diff(self)
    }
}

impl Outputter for Summary {
    fn to_text(&self) -> Result<String, std::fmt::Error> {
        TextOutput::summary(self)
    }
}
