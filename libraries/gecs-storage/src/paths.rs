//! Application folder layout
//!
//! Resolved once at startup and handed to every component that touches the
//! filesystem, instead of living in a process-wide cache.

use crate::error::Result;
use directories::UserDirs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the application folder inside the user's documents folder
pub const APP_FOLDER_NAME: &str = "GecsPlayer";

/// Name of the music folder inside the application folder
pub const MUSIC_FOLDER_NAME: &str = "Music";

/// Resolved application folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPaths {
    /// Application folder, holds persisted state and albums
    pub base: PathBuf,

    /// Music root scanned for tracks
    pub music: PathBuf,
}

impl FolderPaths {
    /// Build the folder layout under `base` without touching the filesystem
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self::with_music_subdir(base, MUSIC_FOLDER_NAME)
    }

    /// Build the folder layout with a custom music folder name
    pub fn with_music_subdir(base: impl AsRef<Path>, music_subdir: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        let music = base.join(music_subdir);
        Self { base, music }
    }

    /// Default application folder: `<Documents>/GecsPlayer`
    ///
    /// Falls back to `<home>/Documents` when the platform reports no
    /// documents folder. Returns `None` if no home directory is known.
    pub fn default_base() -> Option<PathBuf> {
        let dirs = UserDirs::new()?;
        let documents = dirs
            .document_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.home_dir().join("Documents"));
        Some(documents.join(APP_FOLDER_NAME))
    }

    /// Create the application and music folders if missing
    pub fn ensure(base: impl AsRef<Path>) -> Result<Self> {
        Self::new(base).create()
    }

    /// Create the folders of an existing layout if missing
    pub fn create(self) -> Result<Self> {
        if !self.music.exists() {
            std::fs::create_dir_all(&self.music)?;
            info!("Created music folder at {:?}", self.music);
        }
        Ok(self)
    }
}
