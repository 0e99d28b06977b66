//! Error types surfaced to the command line

use std::path::PathBuf;
use thiserror::Error;

/// Every way a dump can fail once the arguments have been supplied.
///
/// The `Display` output of each variant is the exact text printed to the user.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Error: File not found at '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error(
        "Error: Sheet '{selector}' not found.\nAvailable sheets: {}",
        list_sheets(.available)
    )]
    SheetNotFound {
        selector: String,
        available: Vec<String>,
    },

    #[error("Error reading spreadsheet file: {0}")]
    Read(#[from] calamine::Error),

    #[error("Error writing output: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors raised while loading or validating a [`crate::DumpConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Format sheet names as `[0] 'First', [1] 'Second'`
pub fn list_sheets(names: &[String]) -> String {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("[{}] '{}'", i, name))
        .collect::<Vec<_>>()
        .join(", ")
}
