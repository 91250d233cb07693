//! Error types for the importer

use gecs_core::GecsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Watcher error: {0}")]
    Watcher(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<ImportError> for GecsError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Io(e) => GecsError::Io(e),
            ImportError::InvalidPath(msg) => GecsError::invalid_input(msg),
            ImportError::FileNotFound(path) => GecsError::not_found("File", path),
            other => GecsError::scan(other.to_string()),
        }
    }
}
