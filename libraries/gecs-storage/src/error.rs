/// Storage-specific errors
use gecs_core::GecsError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid key or payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Backend error reported by a durable store
    #[error(transparent)]
    Backend(#[from] GecsError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for GecsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => GecsError::not_found(entity, id),
            StorageError::InvalidInput(msg) => GecsError::invalid_input(msg),
            StorageError::Backend(inner) => inner,
            other => GecsError::storage(other.to_string()),
        }
    }
}
