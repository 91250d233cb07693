//! Gecs Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Gecs Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `AppState`, `RepeatMode`
//! - **Collaborator Traits**: `DurableStore`, `LibraryScanner`, `TrackFetcher`
//! - **Error Handling**: Unified `GecsError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use gecs_core::types::{Album, AppState, RepeatMode, Track, TrackId};
//! use std::path::PathBuf;
//!
//! let track = Track::new(
//!     TrackId::new("1a2b3c4d"),
//!     "Song",
//!     PathBuf::from("/music/song.mp3"),
//!     PathBuf::from("song.mp3"),
//! );
//! let album = Album::new("Road trip", vec![track]).unwrap();
//! assert_eq!(album.tracks.len(), 1);
//!
//! let state = AppState::default();
//! assert_eq!(state.volume, 70);
//! assert_eq!(state.repeat_mode.cycle(), RepeatMode::All);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{GecsError, Result};
pub use traits::{DurableStore, FetchOutcome, LibraryScanner, TrackFetcher};
pub use types::{Album, AlbumCover, AlbumId, AppState, RepeatMode, Track, TrackId};
