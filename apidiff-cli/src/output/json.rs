//! JSON output formatting for machine-readable output.

use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as pretty-printed JSON.
    pub fn format<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(data)
    }
}
