//! YAML output, the default format.

use serde::Serialize;

/// YAML output formatter
pub struct YamlOutput;

impl YamlOutput {
    /// Format data as a YAML document.
    ///
    /// Field order follows the diff tree, so sections appear in document order.
    pub fn format<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(data)
    }
}
