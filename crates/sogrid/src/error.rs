//! Error types for SO-Grid.
//!
//! Grid state setters never fail; only operations that touch files or parse
//! configuration return errors.

use std::path::PathBuf;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while exporting data or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration parse error.
    #[error("Failed to parse {format} configuration: {message}")]
    ConfigParse { format: &'static str, message: String },

    /// Export delivery error.
    #[error("Export failed: {0}")]
    Export(String),
}

impl GridError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration parse error.
    pub fn config_parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            format,
            message: message.into(),
        }
    }

    /// Create an export error.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::config_parse("TOML", "expected a table");
        assert_eq!(
            err.to_string(),
            "Failed to parse TOML configuration: expected a table"
        );

        let err = GridError::io(
            "/tmp/out.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out.csv"));
    }
}
