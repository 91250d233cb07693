//! Test helpers and fixtures for storage integration tests
//!
//! These helpers use REAL files in a temporary directory (NOT the in-memory
//! store) to match production behavior.

use gecs_core::types::{Track, TrackId};
use gecs_storage::{JsonFileStore, StateStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test store wrapper that cleans up on drop
pub struct TestStore {
    pub store: StateStore,
    temp_dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = StateStore::new(Arc::new(JsonFileStore::new(temp_dir.path())));
        Self { store, temp_dir }
    }

    /// Re-open the same directory with a fresh store (simulates an app restart)
    pub fn reopen(&self) -> StateStore {
        StateStore::new(Arc::new(JsonFileStore::new(self.temp_dir.path())))
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

pub fn track(id: &str) -> Track {
    Track::new(
        TrackId::new(id),
        format!("Track {id}"),
        PathBuf::from(format!("/music/{id}.mp3")),
        PathBuf::from(format!("{id}.mp3")),
    )
}
