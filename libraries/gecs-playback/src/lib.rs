//! Gecs Player - Playback Management
//!
//! Platform-agnostic playback core for Gecs Player.
//!
//! This crate provides:
//! - Shuffle sequencing (Fisher-Yates permutations, regenerated on demand)
//! - Repeat modes (Off, All, One) and the end-of-track policy
//! - Navigation over the active playlist (next/previous/select)
//! - Playlist selection (full library or one album)
//! - Volume control (logarithmic, 0-100%)
//! - A transport state machine layered over a [`MediaEngine`]
//! - The [`Player`] orchestrator, persisting settings through `gecs-storage`
//!
//! # Architecture
//!
//! Audio output is provided by the platform through the [`MediaEngine`]
//! trait; the crate never decodes audio itself. Engine notifications are
//! fed back in as [`MediaEvent`]s, and UI-facing changes are drained as
//! [`PlayerEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use gecs_playback::{MediaEngine, MediaEvent, Player, Result};
//! use gecs_storage::{MemoryStore, StateStore};
//! use std::sync::Arc;
//! use url::Url;
//!
//! struct Silent;
//!
//! impl MediaEngine for Silent {
//!     fn set_source(&mut self, _url: &Url) {}
//!     fn load(&mut self) {}
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _amplitude: f32) {}
//! }
//!
//! let store = StateStore::new(Arc::new(MemoryStore::new()));
//! let mut player = Player::new(Silent, store);
//!
//! // Nothing scanned yet: navigation is a no-op
//! assert!(!player.next());
//! assert!(player.current_track().is_none());
//!
//! player.handle_media_event(MediaEvent::CanPlay);
//! assert!(!player.is_playing());
//! ```

mod error;
mod events;
mod media;
mod navigation;
mod player;
mod playlist;
mod repeat;
mod shuffle;
mod transport;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use media::{source_url, MediaEngine, MediaEvent};
pub use navigation::Navigator;
pub use player::Player;
pub use playlist::{ActiveSource, PlaylistSelection};
pub use repeat::EndOfTrack;
pub use shuffle::{shuffled_indices, ShuffleSequencer};
pub use transport::{Transport, TransportAction};
pub use types::{ResumePoint, ScanTicket, TransportState};
pub use volume::{percentage_to_amplitude, Volume, MAX_DB, MIN_DB};
