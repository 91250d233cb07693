//! Metadata extraction from audio files

use crate::{ImportError, Result};
use gecs_core::AlbumCover;
use lofty::{Accessor, AudioFile, Probe, TaggedFileExt};
use std::borrow::Cow;
use std::path::Path;

/// Tag data read from an audio file
///
/// Every field is optional; callers apply their own fallbacks.
#[derive(Debug, Clone, Default)]
pub struct ExtractedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,

    /// Duration in seconds
    pub duration_seconds: Option<f64>,

    /// First embedded picture
    pub cover: Option<AlbumCover>,
}

/// Extract metadata from an audio file
pub fn extract_metadata(path: &Path) -> Result<ExtractedMetadata> {
    let tagged_file = Probe::open(path)
        .map_err(|e| ImportError::Metadata(format!("Failed to open file: {}", e)))?
        .read()
        .map_err(|e| ImportError::Metadata(format!("Failed to read file: {}", e)))?;

    let duration = tagged_file.properties().duration().as_secs_f64();
    let duration_seconds = (duration > 0.0).then_some(duration);

    // Prefer the format's native tag (ID3v2 for MP3, Vorbis for OGG/FLAC)
    let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) else {
        return Ok(ExtractedMetadata {
            duration_seconds,
            ..ExtractedMetadata::default()
        });
    };

    let cover = tag.pictures().first().map(|picture| {
        let data = picture.data().to_vec();
        AlbumCover::new(detect_image_mime(&data), data)
    });

    Ok(ExtractedMetadata {
        title: non_empty(tag.title()),
        artist: non_empty(tag.artist()),
        album: non_empty(tag.album()),
        duration_seconds,
        cover,
    })
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Detect an image MIME type from its leading bytes
///
/// Unknown data is reported as `image/jpeg`, the most common embedded format.
pub fn detect_image_mime(data: &[u8]) -> &'static str {
    match data {
        [0xFF, 0xD8, ..] => "image/jpeg",
        [0x89, 0x50, ..] => "image/png",
        [0x47, 0x49, ..] => "image/gif",
        [0x42, 0x4D, ..] => "image/bmp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_image_mime() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(detect_image_mime(b"\x89PNG\r\n\x1a\n"), "image/png");
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
        assert_eq!(detect_image_mime(b"BM\x00\x00"), "image/bmp");
        assert_eq!(detect_image_mime(b"RIFF\x10\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(detect_image_mime(b"RIFF\x10\x00\x00\x00WAVE"), "image/jpeg");
        assert_eq!(detect_image_mime(&[]), "image/jpeg");
    }

    #[test]
    fn test_unrecognized_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.xyz");
        fs::write(&path, b"definitely not audio").unwrap();

        assert!(matches!(
            extract_metadata(&path),
            Err(ImportError::Metadata(_))
        ));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(Some(Cow::Borrowed("  Song "))), Some("Song".into()));
        assert_eq!(non_empty(Some(Cow::Borrowed("   "))), None);
        assert_eq!(non_empty(None), None);
    }
}
