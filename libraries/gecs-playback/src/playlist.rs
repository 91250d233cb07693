//! Playlist selection
//!
//! Resolves the active playlist as either the scanned library or the tracks
//! of one selected album.

use gecs_core::{Album, Track, TrackId};

/// Which collection currently drives navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    Library,
    Album,
}

/// Library plus the optionally selected album
#[derive(Debug, Clone, Default)]
pub struct PlaylistSelection {
    library: Vec<Track>,
    album: Option<Album>,
}

impl PlaylistSelection {
    pub fn new(library: Vec<Track>) -> Self {
        Self {
            library,
            album: None,
        }
    }

    /// The ordered tracks driving navigation
    pub fn active(&self) -> &[Track] {
        match &self.album {
            Some(album) => &album.tracks,
            None => &self.library,
        }
    }

    pub fn source(&self) -> ActiveSource {
        if self.album.is_some() {
            ActiveSource::Album
        } else {
            ActiveSource::Library
        }
    }

    pub fn is_album_mode(&self) -> bool {
        self.album.is_some()
    }

    pub fn library(&self) -> &[Track] {
        &self.library
    }

    pub fn album(&self) -> Option<&Album> {
        self.album.as_ref()
    }

    /// Replace the library with fresh scan results
    ///
    /// Returns `true` if the active playlist is the library (and so changed).
    pub fn set_library(&mut self, tracks: Vec<Track>) -> bool {
        self.library = tracks;
        self.album.is_none()
    }

    /// Make an album the active playlist
    ///
    /// An album without tracks clears the selection instead, so navigation
    /// falls back to the library.
    pub fn select_album(&mut self, album: Album) {
        if album.is_empty() {
            self.album = None;
        } else {
            self.album = Some(album);
        }
    }

    /// Return to the full library
    ///
    /// Returns `true` if an album was selected.
    pub fn clear_album(&mut self) -> bool {
        self.album.take().is_some()
    }

    /// Position of a track in the active playlist
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.active().iter().position(|t| &t.id == id)
    }
}
