//! Error types for playback management

use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Track path cannot be turned into a media source
    #[error("Invalid media source: {0:?}")]
    InvalidSource(PathBuf),

    /// The media engine refused to start playback
    #[error("Playback rejected: {0}")]
    Rejected(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
