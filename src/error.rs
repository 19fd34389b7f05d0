//! Error types for dataset loading and configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a table from CSV.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to open or parse the CSV file.
    #[error("Failed to read CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row is missing or has no columns.
    #[error("CSV {path} has no header columns")]
    EmptyHeader { path: PathBuf },

    /// The same header name appears twice; column names must be unique.
    #[error("CSV {path} repeats column '{name}'")]
    DuplicateColumn { path: PathBuf, name: String },
}

/// Problems with a single config value.  These are logged and the default
/// is kept; they never abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid placement '{0}' (expected e.g. bottom-end, top-start, left)")]
    InvalidPlacement(String),

    #[error("invalid key binding '{value}' for {action}")]
    InvalidKey { action: String, value: String },

    #[error("invalid number '{value}' for {key}")]
    InvalidNumber { key: String, value: String },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
