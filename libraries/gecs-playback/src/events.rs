//! Player events
//!
//! Recorded by the [`Player`](crate::Player) as state changes and drained by
//! the front-end to keep its view in sync.

use crate::types::TransportState;
use gecs_core::{RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Current track changed
    TrackChanged {
        /// New current track (`None` when the playlist is empty)
        track_id: Option<TrackId>,
        /// Index into the active playlist
        index: usize,
    },

    /// Transport state changed
    StateChanged {
        state: TransportState,
        is_playing: bool,
    },

    /// Volume changed (0-100)
    VolumeChanged { level: u8 },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// Repeat mode cycled
    RepeatChanged { mode: RepeatMode },

    /// Active playlist replaced (rescan, album select/clear)
    PlaylistChanged { len: usize, album_mode: bool },

    /// A swallowed failure the user may want to see
    Error { message: String },
}
