//! apidiff configuration loading from `.apidiff.toml`.
//!
//! Configuration is optional. When the file is missing or unreadable the
//! defaults apply, and command-line flags always override file values.
//!
//! # Example Configuration
//!
//! ```toml
//! [diff]
//! exclude_examples = true
//! exclude_description = false
//! filter = "^/v1/"
//! filter_extension = "^x-internal$"
//! prefix = "/v2"
//! breaking_only = false
//!
//! [output]
//! format = "text"
//! color = true
//! ```

use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = ".apidiff.toml";

/// Root configuration structure loaded from `.apidiff.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct ApidiffConfig {
    /// Comparison defaults.
    #[serde(default)]
    pub diff: DiffSettings,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Defaults for the comparison flags.
///
/// Boolean settings can only switch a behavior on; a flag on the command
/// line cannot switch it back off.
#[derive(Debug, Deserialize, Default)]
pub struct DiffSettings {
    #[serde(default)]
    pub exclude_examples: bool,

    #[serde(default)]
    pub exclude_description: bool,

    /// Regular expression selecting the paths to compare.
    #[serde(default)]
    pub filter: Option<String>,

    /// Regular expression over extension names; matching paths and
    /// operations are left out of the comparison.
    #[serde(default)]
    pub filter_extension: Option<String>,

    /// Prefix stripped from revision paths before matching.
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub breaking_only: bool,
}

/// Output formatting preferences.
///
/// `--format` on the command line overrides `format`.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format.
    ///
    /// Valid values: `yaml`, `json`, `text`, `html`
    /// Default: `yaml`
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Auto-detected when unset.
    #[serde(default)]
    pub color: Option<bool>,
}

impl ApidiffConfig {
    /// Load configuration from `.apidiff.toml` in the given directory.
    ///
    /// Parse errors are logged as warnings and the defaults are returned.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Check if colored output should be used.
    ///
    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
