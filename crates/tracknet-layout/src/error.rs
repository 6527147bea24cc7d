//! Error types for layout operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or building a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File extension is neither `.json` nor `.toml`
    #[error("unsupported layout format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// Graph construction failed
    #[error("build failed: {0}")]
    Build(#[from] tracknet_core::BuildError),
}

impl LayoutError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LayoutError::ReadFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = LayoutError::read_file("/some/layout.json", mock_io_err());
        assert!(
            matches!(err, LayoutError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/layout.json"))
        );
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn read_file_display() {
        let msg = LayoutError::read_file("/a/b.json", mock_io_err()).to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/b.json"), "got: {msg}");
    }

    #[test]
    fn unsupported_format_display() {
        let err = LayoutError::UnsupportedFormat("yaml".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported layout format 'yaml' (expected .json or .toml)"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn build_error_converts() {
        let err: LayoutError = tracknet_core::BuildError::UnknownModule("m9".into()).into();
        assert_eq!(
            err.to_string(),
            "build failed: junction references unknown module 'm9'"
        );
    }
}
