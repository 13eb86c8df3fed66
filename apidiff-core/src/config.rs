//! Per-run comparison options.

use regex::Regex;

use crate::error::{Error, Result};
use crate::openapi::Extensions;

/// Options for a single comparison.
///
/// Built once with the chained builders below and passed by reference to
/// [`compare`](crate::compare); never modified while a comparison runs.
///
/// ```
/// use apidiff_core::Config;
///
/// let config = Config::default()
///     .excluding_examples()
///     .with_path_filter("^/pets")
///     .unwrap()
///     .with_path_prefix("/v2");
/// assert!(config.exclude_examples);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Skip every example and examples comparison.
    pub exclude_examples: bool,
    /// Skip every description and summary comparison.
    pub exclude_description: bool,
    /// Prune the result to breaking changes.
    pub breaking_only: bool,
    path_filter: Option<Regex>,
    extension_filter: Option<Regex>,
    path_prefix: Option<String>,
}

impl Config {
    /// A configuration that compares everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore changes to `example` and `examples`.
    pub fn excluding_examples(mut self) -> Self {
        self.exclude_examples = true;
        self
    }

    /// Ignore changes to descriptions and summaries.
    pub fn excluding_descriptions(mut self) -> Self {
        self.exclude_description = true;
        self
    }

    /// Keep only the parts of the diff that break existing clients.
    pub fn breaking_changes_only(mut self) -> Self {
        self.breaking_only = true;
        self
    }

    /// Only compare paths matching `pattern`. An empty pattern disables the filter.
    pub fn with_path_filter(mut self, pattern: &str) -> Result<Self> {
        self.path_filter = compile(pattern).map_err(|source| Error::InvalidPathFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self)
    }

    /// Leave out paths and operations carrying an extension whose name matches
    /// `pattern`. An empty pattern disables the filter.
    pub fn with_extension_filter(mut self, pattern: &str) -> Result<Self> {
        self.extension_filter = compile(pattern).map_err(|source| {
            Error::InvalidExtensionFilter {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(self)
    }

    /// Strip `prefix` from revision paths before matching them to base paths.
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        self.path_prefix = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// The compiled path filter, if one is set.
    pub fn path_filter(&self) -> Option<&Regex> {
        self.path_filter.as_ref()
    }

    /// The compiled extension filter, if one is set.
    pub fn extension_filter(&self) -> Option<&Regex> {
        self.extension_filter.as_ref()
    }

    /// The revision path prefix, without a trailing `/`.
    ///
    /// ```
    /// use apidiff_core::Config;
    ///
    /// assert_eq!(Config::new().with_path_prefix("/v2/").path_prefix(), Some("/v2"));
    /// assert_eq!(Config::new().with_path_prefix("/").path_prefix(), None);
    /// ```
    pub fn path_prefix(&self) -> Option<&str> {
        self.path_prefix.as_deref()
    }

    pub(crate) fn includes_path(&self, path: &str) -> bool {
        self.path_filter
            .as_ref()
            .map_or(true, |filter| filter.is_match(path))
    }

    /// Whether an object is hidden by the extension filter.
    pub(crate) fn excludes(&self, extensions: &Extensions) -> bool {
        match &self.extension_filter {
            Some(filter) => extensions.keys().any(|key| filter.is_match(key)),
            None => false,
        }
    }

    /// Map a revision path onto the base path space.
    ///
    /// The prefix only matches whole segments: with `/v2`, `/v2/items` maps
    /// to `/items` and `/v2` to `/`, while `/v2beta/items` is left alone.
    pub(crate) fn unprefixed<'p>(&self, path: &'p str) -> &'p str {
        let Some(prefix) = &self.path_prefix else {
            return path;
        };
        match path.strip_prefix(prefix.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

fn compile(pattern: &str) -> std::result::Result<Option<Regex>, regex::Error> {
    if pattern.is_empty() {
        Ok(None)
    } else {
        Regex::new(pattern).map(Some)
    }
}
