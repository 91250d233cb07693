//! Media engine abstraction
//!
//! The transport drives an underlying audio primitive through this trait and
//! is fed its notifications as [`MediaEvent`]s.

use crate::error::{PlaybackError, Result};
use std::path::Path;
use url::Url;

/// Platform audio playback primitive
///
/// Implementors own decoding and output. Calls are made from the single
/// thread that owns the [`Player`](crate::Player); readiness, progress and
/// end-of-track are reported back asynchronously as [`MediaEvent`]s.
pub trait MediaEngine: Send {
    /// Attach a new source, replacing the previous one
    fn set_source(&mut self, url: &Url);

    /// Start loading the attached source
    ///
    /// Loading stops any running playback. [`MediaEvent::CanPlay`] follows
    /// once the source is playable.
    fn load(&mut self);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback started
    /// * `Err(_)` - Playback refused (e.g. unattended autoplay blocked)
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    fn set_current_time(&mut self, seconds: f64);

    /// Set the linear output amplitude (0.0-1.0)
    fn set_volume(&mut self, amplitude: f32);
}

/// Notifications emitted by a [`MediaEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic position update
    TimeUpdate(f64),

    /// Duration is known
    LoadedMetadata { duration: f64 },

    /// The loaded source can start playing
    CanPlay,

    /// Playback reached the end of the source
    Ended,

    /// Loading or playback failed
    Error(String),
}

/// Turn a track's absolute file path into a `file://` source URL
pub fn source_url(path: &Path) -> Result<Url> {
    Url::from_file_path(path).map_err(|()| PlaybackError::InvalidSource(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn absolute_path_becomes_file_url() {
        let url = source_url(Path::new("/music/My Song.mp3")).unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.as_str(), "file:///music/My%20Song.mp3");
    }

    #[test]
    fn relative_path_is_rejected() {
        assert!(matches!(
            source_url(Path::new("music/song.mp3")),
            Err(PlaybackError::InvalidSource(_))
        ));
    }
}
