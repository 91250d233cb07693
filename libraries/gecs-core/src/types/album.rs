//! Album (user playlist) types

use crate::error::{GecsError, Result};
use crate::types::{AlbumId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A user-defined, named collection of tracks
///
/// Albums are persisted as a whole collection; there is no per-album storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub tracks: Vec<Track>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Album {
    /// Create a new album
    ///
    /// The name is trimmed and must not be empty. Duplicate tracks (by id)
    /// are dropped, keeping the first occurrence.
    pub fn new(name: &str, tracks: Vec<Track>) -> Result<Self> {
        Ok(Self {
            id: AlbumId::generate(),
            name: validate_name(name)?,
            tracks: dedup_tracks(tracks),
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Replace the album's tracks
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = dedup_tracks(tracks);
        self.updated_at = Some(Utc::now());
    }

    /// Rename the album
    pub fn rename(&mut self, name: &str) -> Result<()> {
        self.name = validate_name(name)?;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Whether the album contains a track
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GecsError::invalid_input("album name must not be empty"));
    }
    Ok(name.to_string())
}

fn dedup_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn track(id: &str) -> Track {
        Track::new(
            TrackId::new(id),
            id,
            PathBuf::from(format!("/music/{id}.mp3")),
            PathBuf::from(format!("{id}.mp3")),
        )
    }

    #[test]
    fn new_album_trims_name() {
        let album = Album::new("  Favourites ", vec![track("a")]).unwrap();
        assert_eq!(album.name, "Favourites");
        assert!(album.updated_at.is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Album::new("   ", vec![]).unwrap_err();
        assert!(matches!(err, GecsError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_tracks_are_dropped() {
        let album = Album::new("Mix", vec![track("a"), track("b"), track("a")]).unwrap();
        let ids: Vec<&str> = album.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn set_tracks_bumps_updated_at() {
        let mut album = Album::new("Mix", vec![track("a")]).unwrap();
        album.set_tracks(vec![track("b"), track("b"), track("c")]);

        assert_eq!(album.tracks.len(), 2);
        assert!(album.contains(&TrackId::new("c")));
        assert!(!album.contains(&TrackId::new("a")));
        assert!(album.updated_at.is_some());
    }

    #[test]
    fn rename_keeps_old_name_on_error() {
        let mut album = Album::new("Mix", vec![]).unwrap();
        assert!(album.rename("").is_err());
        assert_eq!(album.name, "Mix");

        album.rename("Better Mix").unwrap();
        assert_eq!(album.name, "Better Mix");
    }
}
