//! Configuration for sheet dumping

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound on the number of columns dumped per sheet.
///
/// Malformed files can report a used range spanning thousands of blank columns.
pub const DEFAULT_MAX_COLUMNS: u32 = 50;

/// Selector keyword that selects every sheet in the workbook
pub const DEFAULT_ALL_KEYWORD: &str = "all";

/// Dump configuration, usually read from `sheetdump.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Maximum number of columns rendered for any sheet
    pub max_columns: u32,
    /// Case-insensitive keyword selecting all sheets
    pub all_keyword: String,
}

impl DumpConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: DumpConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check that the configured values can drive a dump
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_columns == 0 {
            return Err(ConfigError::Invalid(
                "max_columns must be at least 1".to_string(),
            ));
        }
        if self.all_keyword.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "all_keyword must not be blank".to_string(),
            ));
        }
        // A numeric keyword would shadow selection by index
        if crate::selector::parse_index(&self.all_keyword).is_some() {
            return Err(ConfigError::Invalid(format!(
                "all_keyword '{}' must not be a number",
                self.all_keyword
            )));
        }
        Ok(())
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            max_columns: DEFAULT_MAX_COLUMNS,
            all_keyword: DEFAULT_ALL_KEYWORD.to_string(),
        }
    }
}
