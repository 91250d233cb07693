//! End-of-track policy

use gecs_core::RepeatMode;

/// What to do when the current track ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTrack {
    /// Rewind and play the same track again
    Replay,

    /// Move on as if "next" was pressed
    Advance,
}

impl EndOfTrack {
    /// Decide the end-of-track action for a repeat mode
    ///
    /// `All` and `Off` both advance: the sequencer always reports a wrap
    /// candidate, so the only special case is replaying a single track.
    pub fn for_mode(mode: RepeatMode) -> Self {
        match mode {
            RepeatMode::One => Self::Replay,
            RepeatMode::Off | RepeatMode::All => Self::Advance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_repeat_one_replays() {
        assert_eq!(EndOfTrack::for_mode(RepeatMode::One), EndOfTrack::Replay);
        assert_eq!(EndOfTrack::for_mode(RepeatMode::All), EndOfTrack::Advance);
        assert_eq!(EndOfTrack::for_mode(RepeatMode::Off), EndOfTrack::Advance);
    }
}
