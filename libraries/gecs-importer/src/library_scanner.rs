//! Library scanner for the music folder
//!
//! Walks the music folder and turns every supported file into a [`Track`].
//! Nothing is cached: each scan reports exactly what is on disk.

use crate::{metadata, scanner, ImportError, Result};
use async_trait::async_trait;
use gecs_core::{LibraryScanner, Track, TrackId};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Number of hex characters kept from the path hash
const TRACK_ID_LEN: usize = 8;

/// Scanner over one music folder
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    root: PathBuf,
}

impl DirectoryScanner {
    /// Create a scanner for `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan synchronously
    ///
    /// Files whose tags cannot be read are still returned, with fallback
    /// metadata.
    pub fn scan_blocking(&self) -> Vec<Track> {
        let start = Instant::now();
        let tracks: Vec<Track> = scanner::find_audio_files(&self.root)
            .iter()
            .map(|path| read_track(&self.root, path))
            .collect();

        info!(
            "Scanned {} tracks in {:?} from {}",
            tracks.len(),
            start.elapsed(),
            self.root.display()
        );
        tracks
    }
}

#[async_trait]
impl LibraryScanner for DirectoryScanner {
    async fn scan(&self) -> gecs_core::Result<Vec<Track>> {
        let scanner = self.clone();
        let tracks = tokio::task::spawn_blocking(move || scanner.scan_blocking())
            .await
            .map_err(|e| ImportError::Task(e.to_string()))?;
        Ok(tracks)
    }
}

/// Stable track id derived from the absolute file path
pub fn track_id_for_path(path: &Path) -> TrackId {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(TRACK_ID_LEN);
    TrackId::new(id)
}

/// Build a track for `path`, falling back to file-derived metadata
pub fn read_track(root: &Path, path: &Path) -> Track {
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();

    let mut track = Track::new(
        track_id_for_path(path),
        title,
        path.to_path_buf(),
        relative_path,
    );

    match metadata::extract_metadata(path) {
        Ok(meta) => {
            if let Some(title) = meta.title {
                track.title = title;
            }
            if let Some(artist) = meta.artist {
                track.artist = artist;
            }
            if let Some(album) = meta.album {
                track.album = album;
            }
            if let Some(duration) = meta.duration_seconds {
                track.duration = duration;
            }
            if let Some(cover) = meta.cover {
                debug!(
                    "Album art found for {}: {} ({} bytes)",
                    path.display(),
                    cover.mime_type,
                    cover.data.len()
                );
                track.album_cover = Some(cover);
            }
        }
        Err(e) => {
            warn!("Error reading metadata for {}: {}", path.display(), e);
        }
    }

    track
}

/// Delete a track's file from the music folder
///
/// Refuses to touch anything that does not resolve to a location inside
/// `root`. The caller rescans afterwards.
pub fn remove_track_file(root: &Path, track: &Track) -> Result<()> {
    if !track.file_path.exists() {
        return Err(ImportError::FileNotFound(
            track.file_path.display().to_string(),
        ));
    }

    let root = root.canonicalize()?;
    let file = track.file_path.canonicalize()?;
    if !file.starts_with(&root) || !file.is_file() {
        return Err(ImportError::InvalidPath(format!(
            "{} is not a file inside {}",
            file.display(),
            root.display()
        )));
    }

    std::fs::remove_file(&file)?;
    info!("Deleted track file {}", file.display());
    Ok(())
}
