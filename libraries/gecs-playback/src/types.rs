//! Core types for playback management

use gecs_core::TrackId;
use serde::{Deserialize, Serialize};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No current track
    Empty,

    /// Source attached, not yet playable
    Loading,

    /// Playable, not playing
    ReadyPaused,

    /// Currently playing
    Playing,

    /// Paused for a scrub-drag
    Seeking,

    /// Track reached its end and is waiting for the next one
    Ended,
}

/// Handle for one library rescan
///
/// Results carrying a ticket older than the newest applied one are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanTicket(pub(crate) u64);

impl ScanTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Playback position captured before an asynchronous gap
///
/// Re-applied afterwards only if the same track is still current.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumePoint {
    /// Track that was current
    pub track_id: Option<TrackId>,

    /// Position in seconds
    pub position: f64,

    /// Whether playback was running
    pub was_playing: bool,
}
