/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Core(#[from] gecs_core::GecsError),

    #[error(transparent)]
    Storage(#[from] gecs_storage::StorageError),

    #[error(transparent)]
    Import(#[from] gecs_importer::ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
