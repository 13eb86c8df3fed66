//! Error types for apidiff-core.
//!
//! Comparison itself cannot fail; the only errors are raised while building a
//! [`Config`](crate::Config).

use thiserror::Error;

/// Result type alias for apidiff-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring a comparison.
#[derive(Error, Debug)]
pub enum Error {
    /// The path filter is not a valid regular expression.
    #[error("Invalid path filter {pattern:?}: {source}")]
    InvalidPathFilter {
        /// Pattern as given.
        pattern: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The extension filter is not a valid regular expression.
    #[error("Invalid extension filter {pattern:?}: {source}")]
    InvalidExtensionFilter {
        /// Pattern as given.
        pattern: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },
}
