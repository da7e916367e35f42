//! Error types for pages-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading configuration or page data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, annotated with the file involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON parse error on load.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A selection pattern that is not a valid regular expression.
    #[error("invalid selection pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Data files must be `.yaml`, `.yml` or `.json`.
    #[error("unsupported data file format: {path}")]
    UnsupportedDataFormat { path: PathBuf },

    /// Every entry of a data collection must be a mapping of template variables.
    #[error("data for '{key}' is not a mapping")]
    NotAnObject { key: String },
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
