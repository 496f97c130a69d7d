//! Argument conversion configuration.

use cmdgate_usage::ConversionOptions;
use serde::Deserialize;

/// Delimiters used by the built-in `list` and `map` converters.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    /// Separator between list elements (default: `,`).
    #[serde(default = "default_list_delimiter")]
    pub list_delimiter: String,
    /// Separator between map rows (default: `,`).
    #[serde(default = "default_map_row_delimiter")]
    pub map_row_delimiter: String,
    /// Separator between a map key and its value (default: `=`).
    #[serde(default = "default_map_value_delimiter")]
    pub map_value_delimiter: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            list_delimiter: default_list_delimiter(),
            map_row_delimiter: default_map_row_delimiter(),
            map_value_delimiter: default_map_value_delimiter(),
        }
    }
}

impl ConversionConfig {
    pub fn to_options(&self) -> ConversionOptions {
        ConversionOptions {
            list_delimiter: self.list_delimiter.clone(),
            map_row_delimiter: self.map_row_delimiter.clone(),
            map_value_delimiter: self.map_value_delimiter.clone(),
        }
    }
}

fn default_list_delimiter() -> String {
    ",".to_string()
}

fn default_map_row_delimiter() -> String {
    ",".to_string()
}

fn default_map_value_delimiter() -> String {
    "=".to_string()
}
