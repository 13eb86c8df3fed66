//! Loading documents from local files or over HTTP.
//!
//! The serialization format is taken from the file extension when it names
//! one, and sniffed from the content otherwise: anything starting with `{`
//! is JSON, everything else is YAML.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use apidiff_core::OpenApi;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }

    /// `file`, `http` or `https`.
    pub fn protocol(&self) -> &'static str {
        match self {
            Source::File(_) => "file",
            Source::Url(url) if url.starts_with("https://") => "https",
            Source::Url(_) => "http",
        }
    }

    /// Lower-cased extension of the file or URL path, if any.
    pub fn extension(&self) -> Option<String> {
        let path = match self {
            Source::File(path) => path.as_path(),
            Source::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                return Path::new(path)
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase());
            }
        };
        path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }

    fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// Read and parse the document at `source`.
pub async fn load(source: &Source) -> Result<OpenApi> {
    let content = match source {
        Source::File(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        Source::Url(url) => fetch(url).await?,
    };
    tracing::debug!(source = %source, bytes = content.len(), "loaded document");

    let format = source
        .extension()
        .and_then(|ext| DocumentFormat::from_extension(&ext))
        .unwrap_or_else(|| DocumentFormat::sniff(&content));
    parse(&content, format).with_context(|| format!("Failed to parse {}", source))
}

async fn fetch(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Failed to fetch {}", url))?;
    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))
}

pub fn parse(content: &str, format: DocumentFormat) -> Result<OpenApi> {
    let document = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("specs/base.yaml"),
            Source::File(PathBuf::from("specs/base.yaml"))
        );
        assert_eq!(
            Source::parse("https://example.com/openapi.json"),
            Source::Url("https://example.com/openapi.json".to_string())
        );
    }

    #[test]
    fn test_source_info() {
        let url = Source::parse("https://example.com/api/openapi.YAML?v=2");
        assert_eq!(url.protocol(), "https");
        assert_eq!(url.extension().as_deref(), Some("yaml"));

        let file = Source::parse("openapi");
        assert_eq!(file.protocol(), "file");
        assert_eq!(file.extension(), None);
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(DocumentFormat::sniff("  {\"openapi\": \"3.0.0\"}"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::sniff("openapi: 3.0.0\n"), DocumentFormat::Yaml);
    }

    #[tokio::test]
    async fn test_load_file_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("openapi");
        std::fs::write(
            &path,
            "openapi: 3.0.3\ninfo:\n  title: T\n  version: v1\npaths:\n  /items: {}\n",
        )
        .unwrap();

        let document = load(&Source::File(path)).await.unwrap();
        assert_eq!(document.info.title, "T");
        assert!(document.paths.contains_key("/items"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load(&Source::parse("/nonexistent/openapi.json")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse("{not json", DocumentFormat::Json).is_err());
    }
}
