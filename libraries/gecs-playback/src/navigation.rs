//! Navigation state machine
//!
//! Owns the current index into the active playlist and the track derived
//! from it.

use crate::shuffle::ShuffleSequencer;
use gecs_core::Track;
use rand::Rng;

/// Current position within the active playlist
///
/// `current_track` is `None` exactly when the last synced playlist was empty.
/// Whenever the playlist is non-empty, `current_index` is within range.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current_index: usize,
    current_track: Option<Track>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Advance to the index chosen by the sequencer
    ///
    /// Returns `true` if the current track changed. An empty playlist, or a
    /// sequencer answer equal to the current index, is a no-op.
    pub fn next<R: Rng>(&mut self, playlist: &[Track], shuffle: &mut ShuffleSequencer<R>) -> bool {
        if playlist.is_empty() {
            return false;
        }

        let next = shuffle.next_index(self.current_index, playlist.len());
        if next == self.current_index {
            return false;
        }

        self.jump_to(playlist, next)
    }

    /// Step back one position, wrapping to the last index
    ///
    /// Always sequential, regardless of shuffle.
    pub fn previous(&mut self, playlist: &[Track]) -> bool {
        if playlist.is_empty() {
            return false;
        }

        let previous = if self.current_index == 0 || self.current_index >= playlist.len() {
            playlist.len() - 1
        } else {
            self.current_index - 1
        };

        self.jump_to(playlist, previous)
    }

    /// Jump to `index`; out-of-range indices are ignored
    pub fn select(&mut self, playlist: &[Track], index: usize) -> bool {
        if index >= playlist.len() {
            return false;
        }
        self.jump_to(playlist, index)
    }

    /// Re-derive the current track after the playlist was replaced
    ///
    /// An out-of-range index is clamped to 0. An empty playlist clears the
    /// current track but leaves the stored index alone.
    pub fn sync_to_playlist(&mut self, playlist: &[Track]) {
        if playlist.is_empty() {
            self.current_track = None;
            return;
        }

        if self.current_index >= playlist.len() {
            self.current_index = 0;
        }
        self.current_track = Some(playlist[self.current_index].clone());
    }

    /// Move to index 0 and re-derive the current track
    pub fn reset(&mut self, playlist: &[Track]) {
        self.current_index = 0;
        self.sync_to_playlist(playlist);
    }

    /// Move to `index` if it lies within `playlist`
    ///
    /// Returns `true` if the index was applied.
    pub fn jump_to(&mut self, playlist: &[Track], index: usize) -> bool {
        match playlist.get(index) {
            Some(track) => {
                self.current_index = index;
                self.current_track = Some(track.clone());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gecs_core::TrackId;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn track(id: &str) -> Track {
        Track::new(
            TrackId::new(id),
            id.to_uppercase(),
            PathBuf::from(format!("/music/{id}.mp3")),
            PathBuf::from(format!("{id}.mp3")),
        )
    }

    fn playlist(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| track(id)).collect()
    }

    fn current_id(nav: &Navigator) -> Option<&str> {
        nav.current_track().map(|t| t.id.as_str())
    }

    #[test]
    fn next_walks_and_wraps() {
        let list = playlist(&["a", "b", "c"]);
        let mut shuffle = ShuffleSequencer::seeded(1);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&list);

        assert!(nav.next(&list, &mut shuffle));
        assert_eq!(nav.current_index(), 1);
        assert_eq!(current_id(&nav), Some("b"));

        assert!(nav.next(&list, &mut shuffle));
        assert_eq!(current_id(&nav), Some("c"));

        assert!(nav.next(&list, &mut shuffle));
        assert_eq!(nav.current_index(), 0);
        assert_eq!(current_id(&nav), Some("a"));
    }

    #[test]
    fn single_track_next_is_noop() {
        let list = playlist(&["only"]);
        let mut shuffle = ShuffleSequencer::seeded(1);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&list);

        assert!(!nav.next(&list, &mut shuffle));
        assert_eq!(current_id(&nav), Some("only"));
    }

    #[test]
    fn empty_playlist_ignores_everything() {
        let list: Vec<Track> = Vec::new();
        let mut shuffle = ShuffleSequencer::seeded(1);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&list);

        assert!(!nav.next(&list, &mut shuffle));
        assert!(!nav.previous(&list));
        assert!(!nav.select(&list, 5));
        assert!(nav.current_track().is_none());
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn previous_wraps_to_last() {
        let list = playlist(&["a", "b", "c"]);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&list);

        assert!(nav.previous(&list));
        assert_eq!(nav.current_index(), 2);
        assert!(nav.previous(&list));
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn previous_is_sequential_under_shuffle() {
        let list = playlist(&["a", "b", "c", "d", "e"]);
        let mut shuffle = ShuffleSequencer::seeded(3);
        shuffle.enable(list.len());
        let mut nav = Navigator::new();
        nav.select(&list, 3);

        assert!(nav.previous(&list));
        assert_eq!(nav.current_index(), 2);
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let list = playlist(&["a", "b"]);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&list);

        assert!(!nav.select(&list, 2));
        assert_eq!(nav.current_index(), 0);
        assert!(nav.select(&list, 1));
        assert_eq!(current_id(&nav), Some("b"));
    }

    #[test]
    fn sync_clamps_out_of_range_index() {
        let long = playlist(&["a", "b", "c", "d"]);
        let short = playlist(&["x", "y"]);
        let mut nav = Navigator::new();
        nav.select(&long, 3);

        nav.sync_to_playlist(&short);
        assert_eq!(nav.current_index(), 0);
        assert_eq!(current_id(&nav), Some("x"));
    }

    #[test]
    fn sync_keeps_index_for_empty_playlist() {
        let list = playlist(&["a", "b", "c"]);
        let mut nav = Navigator::new();
        nav.select(&list, 2);

        nav.sync_to_playlist(&[]);
        assert!(nav.current_track().is_none());
        assert_eq!(nav.current_index(), 2);

        nav.sync_to_playlist(&list);
        assert_eq!(current_id(&nav), Some("c"));
    }

    #[test]
    fn sync_rederives_track_from_new_playlist() {
        let before = playlist(&["a", "b"]);
        let after = playlist(&["z", "b"]);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&before);

        nav.sync_to_playlist(&after);
        assert_eq!(current_id(&nav), Some("z"));
    }

    proptest! {
        #[test]
        fn sequential_next_is_cyclic(len in 1usize..40) {
            let ids: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
            let list: Vec<Track> = ids.iter().map(|id| track(id)).collect();
            let mut shuffle = ShuffleSequencer::seeded(0);
            let mut nav = Navigator::new();
            nav.sync_to_playlist(&list);

            for _ in 0..len {
                nav.next(&list, &mut shuffle);
            }

            prop_assert_eq!(nav.current_index(), 0);
        }

        #[test]
        fn index_stays_in_range(
            len in 1usize..20,
            ops in prop::collection::vec(0u8..3, 0..60),
            targets in prop::collection::vec(0usize..30, 60),
        ) {
            let ids: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
            let list: Vec<Track> = ids.iter().map(|id| track(id)).collect();
            let mut shuffle = ShuffleSequencer::seeded(9);
            shuffle.enable(len);
            let mut nav = Navigator::new();
            nav.sync_to_playlist(&list);

            for (op, target) in ops.iter().zip(targets.iter()) {
                match op {
                    0 => { nav.next(&list, &mut shuffle); }
                    1 => { nav.previous(&list); }
                    _ => { nav.select(&list, *target); }
                }
                prop_assert!(nav.current_index() < len);
                let expected = &list[nav.current_index()].id;
                prop_assert_eq!(nav.current_track().map(|t| &t.id), Some(expected));
            }
        }
    }
}
