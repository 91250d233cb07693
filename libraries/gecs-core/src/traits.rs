/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::Track;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Durable key/blob storage
///
/// The playback core only needs "get a blob by key" and "replace the blob
/// stored under a key". Implementations may be file-backed, in-memory, or
/// anything else with the same contract.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the blob stored under `key`
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`
    async fn set(&self, key: &str, blob: &[u8]) -> Result<()>;
}

/// Source of the full track library
///
/// `scan` must be safely re-callable: it only reports what is currently on
/// disk and has no other side effects.
#[async_trait]
pub trait LibraryScanner: Send + Sync {
    /// Scan the music folder and return every playable track
    async fn scan(&self) -> Result<Vec<Track>>;
}

/// Downloads a track from a remote audio-sharing URL into the music folder
#[async_trait]
pub trait TrackFetcher: Send + Sync {
    /// Download `url`
    ///
    /// Failures are reported through [`FetchOutcome::error`], never as a panic
    /// or an `Err`, so the caller can always show a result to the user.
    async fn download(&self, url: &str) -> FetchOutcome;
}

/// Result of a [`TrackFetcher::download`] call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// Whether the file was downloaded
    pub success: bool,

    /// Absolute path of the downloaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// File name of the downloaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Remote title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Remote uploader / artist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Remote album
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Remote duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// The URL that was fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchOutcome {
    /// Build a failed outcome
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
