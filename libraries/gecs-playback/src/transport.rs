//! Playback transport
//!
//! A thin state machine over a [`MediaEngine`]: attaches track sources,
//! mirrors play/pause/seek/volume and reacts to the engine's events.

use crate::{
    error::{PlaybackError, Result},
    media::{source_url, MediaEngine, MediaEvent},
    repeat::EndOfTrack,
    types::TransportState,
    volume::Volume,
};
use gecs_core::{RepeatMode, Track};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Follow-up the caller has to perform after a media event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportAction {
    /// Track ended; move to the next one
    Advance,
}

/// Transport bound to one media engine
pub struct Transport<E: MediaEngine> {
    engine: E,
    state: TransportState,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    volume: Volume,
    /// Cleared by the first `CanPlay`; the cold-start track loads silently
    first_load: bool,
    source: Option<PathBuf>,
}

impl<E: MediaEngine> Transport<E> {
    /// Wrap an engine, applying the default volume
    pub fn new(engine: E) -> Self {
        let mut transport = Self {
            engine,
            state: TransportState::Empty,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: Volume::default(),
            first_load: true,
            source: None,
        };
        transport.engine.set_volume(transport.volume.amplitude());
        transport
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Path of the attached source
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Attach a new track, or detach with `None`
    ///
    /// Playback starts once the engine reports [`MediaEvent::CanPlay`],
    /// except for the very first load.
    pub fn load(&mut self, track: Option<&Track>) -> Result<()> {
        self.current_time = 0.0;
        self.is_playing = false;

        let Some(track) = track else {
            self.engine.pause();
            self.source = None;
            self.duration = 0.0;
            self.state = TransportState::Empty;
            return Ok(());
        };

        let url = match source_url(&track.file_path) {
            Ok(url) => url,
            Err(e) => {
                self.engine.pause();
                self.source = None;
                self.duration = 0.0;
                self.state = TransportState::Empty;
                return Err(e);
            }
        };

        debug!(track_id = %track.id, url = %url, "Loading track");
        self.engine.set_source(&url);
        self.engine.load();
        self.source = Some(track.file_path.clone());
        self.duration = track.duration;
        self.state = TransportState::Loading;
        Ok(())
    }

    /// Feed an engine notification into the state machine
    pub fn handle_media_event(
        &mut self,
        event: MediaEvent,
        repeat: RepeatMode,
    ) -> Option<TransportAction> {
        match event {
            MediaEvent::TimeUpdate(seconds) => {
                self.current_time = seconds;
                None
            }
            MediaEvent::LoadedMetadata { duration } => {
                if self.duration <= 0.0 && duration.is_finite() && duration > 0.0 {
                    self.duration = duration;
                }
                None
            }
            MediaEvent::CanPlay => {
                // Only a load we started consumes the cold-start flag
                if self.state == TransportState::Loading {
                    let autoplay = !std::mem::replace(&mut self.first_load, false);
                    if autoplay {
                        if let Err(e) = self.start() {
                            warn!("Autoplay failed: {}", e);
                        }
                    } else {
                        self.state = TransportState::ReadyPaused;
                    }
                }
                None
            }
            MediaEvent::Ended => match EndOfTrack::for_mode(repeat) {
                EndOfTrack::Replay => {
                    self.engine.set_current_time(0.0);
                    self.current_time = 0.0;
                    if let Err(e) = self.start() {
                        warn!("Replay failed: {}", e);
                    }
                    None
                }
                EndOfTrack::Advance => {
                    self.state = TransportState::Ended;
                    Some(TransportAction::Advance)
                }
            },
            MediaEvent::Error(message) => {
                warn!("Media engine error: {}", message);
                self.is_playing = false;
                self.state = if self.source.is_some() {
                    TransportState::ReadyPaused
                } else {
                    TransportState::Empty
                };
                None
            }
        }
    }

    /// Toggle between playing and paused
    ///
    /// Returns the new playing flag. A refused `play()` leaves it false.
    pub fn play_pause(&mut self) -> Result<bool> {
        if self.is_playing {
            self.pause();
        } else {
            self.resume()?;
        }
        Ok(self.is_playing)
    }

    /// Move the clock to `seconds`, clamped to the known duration
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let mut target = seconds.max(0.0);
        if self.duration > 0.0 {
            target = target.min(self.duration);
        }

        self.engine.set_current_time(target);
        self.current_time = target;
        Ok(())
    }

    /// Begin a scrub-drag
    ///
    /// Pauses if playing and reports whether playback was running.
    pub fn drag_start(&mut self) -> bool {
        let was_playing = self.is_playing;
        if was_playing {
            self.engine.pause();
            self.is_playing = false;
            self.state = TransportState::Seeking;
        }
        was_playing
    }

    /// End a scrub-drag
    ///
    /// Resumes playback whether or not it was running when the drag began.
    pub fn drag_end(&mut self) -> Result<()> {
        self.resume()
    }

    /// Set the volume percentage (0-100, clamped)
    pub fn set_volume(&mut self, level: u8) -> u8 {
        self.volume.set_level(level);
        self.engine.set_volume(self.volume.amplitude());
        self.volume.level()
    }

    /// Pause and rewind to the start
    pub fn stop(&mut self) {
        self.engine.pause();
        self.engine.set_current_time(0.0);
        self.current_time = 0.0;
        self.is_playing = false;
        self.state = if self.source.is_some() {
            TransportState::ReadyPaused
        } else {
            TransportState::Empty
        };
    }

    pub fn pause(&mut self) {
        self.engine.pause();
        self.is_playing = false;
        if matches!(
            self.state,
            TransportState::Playing | TransportState::Seeking
        ) {
            self.state = TransportState::ReadyPaused;
        }
    }

    /// Start playback of the attached source
    pub fn resume(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.start()
    }

    /// Playback position as a percentage of the duration (0 when unknown)
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    fn start(&mut self) -> Result<()> {
        match self.engine.play() {
            Ok(()) => {
                self.is_playing = true;
                self.state = TransportState::Playing;
                Ok(())
            }
            Err(e) => {
                self.is_playing = false;
                self.state = TransportState::ReadyPaused;
                Err(e)
            }
        }
    }
}
