/// Track domain type
use crate::types::TrackId;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

/// Audio track produced by the library scanner
///
/// Immutable once scanned; identity is by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Stable hash of the absolute file path
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Duration in seconds (0 if unknown)
    #[serde(default)]
    pub duration: f64,

    /// Embedded cover art
    #[serde(default)]
    pub album_cover: Option<AlbumCover>,

    /// Absolute file path
    pub file_path: PathBuf,

    /// Path relative to the music root
    pub relative_path: PathBuf,
}

impl Track {
    /// Default artist for files without an artist tag
    pub const UNKNOWN_ARTIST: &'static str = "Unknown Artist";

    /// Default album for files without an album tag
    pub const UNKNOWN_ALBUM: &'static str = "Unknown Album";

    /// Create a track with fallback metadata
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        file_path: PathBuf,
        relative_path: PathBuf,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: Self::UNKNOWN_ARTIST.to_string(),
            album: Self::UNKNOWN_ALBUM.to_string(),
            duration: 0.0,
            album_cover: None,
            file_path,
            relative_path,
        }
    }

    /// Whether the duration is known
    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }
}

/// Embedded album cover image
///
/// Persisted as a `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumCover {
    /// Image MIME type, e.g. `image/jpeg`
    pub mime_type: String,

    /// Encoded image bytes
    pub data: Vec<u8>,
}

impl AlbumCover {
    /// Create a new cover
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Render as a data URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        if mime_type.is_empty() {
            return None;
        }
        let data = STANDARD.decode(payload).ok()?;
        Some(Self::new(mime_type, data))
    }
}

impl Serialize for AlbumCover {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for AlbumCover {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        Self::from_data_url(&url).ok_or_else(|| de::Error::custom("invalid cover data URL"))
    }
}
