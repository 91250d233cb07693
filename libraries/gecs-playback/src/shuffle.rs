//! Shuffle sequencing
//!
//! Keeps a random permutation of playlist indices and answers "what plays
//! after this index" for both shuffled and sequential playback.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Produce a uniformly random permutation of `0..len`
///
/// Fisher-Yates from the end: every permutation is equally likely.
pub fn shuffled_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

/// Decides the next playlist index under shuffle or sequential order
///
/// The permutation is only meaningful while shuffle is enabled and its length
/// matches the active playlist; otherwise it is regenerated on demand.
#[derive(Debug, Clone)]
pub struct ShuffleSequencer<R = StdRng> {
    enabled: bool,
    permutation: Vec<usize>,
    rng: R,
}

impl ShuffleSequencer<StdRng> {
    /// Create a disabled sequencer seeded from system entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a disabled sequencer with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ShuffleSequencer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ShuffleSequencer<R> {
    /// Create a disabled sequencer using `rng` for permutations
    pub fn with_rng(rng: R) -> Self {
        Self {
            enabled: false,
            permutation: Vec::new(),
            rng,
        }
    }

    /// Whether shuffle is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current permutation (empty while disabled)
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Enable shuffle and generate a fresh permutation of `0..len`
    pub fn enable(&mut self, len: usize) {
        self.enabled = true;
        self.regenerate(len);
    }

    /// Disable shuffle and discard the permutation
    pub fn disable(&mut self) {
        self.enabled = false;
        self.permutation.clear();
    }

    /// Flip shuffle on or off, returning the new flag
    pub fn toggle(&mut self, len: usize) -> bool {
        if self.enabled {
            self.disable();
        } else {
            self.enable(len);
        }
        self.enabled
    }

    /// Restore the persisted flag without generating a permutation
    ///
    /// The first call to [`next_index`](Self::next_index) generates one.
    pub fn restore(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.permutation.clear();
    }

    /// Index to play after `current` in a playlist of `len` tracks
    ///
    /// Sequential order wraps from the last index to 0; whether playback
    /// actually loops is up to the caller. Under shuffle, the entry after
    /// `current` in the permutation is returned. When `current` is missing,
    /// is the last entry, or the permutation is stale, a new permutation is
    /// generated and its first entry returned.
    ///
    /// An empty playlist returns `current` unchanged.
    pub fn next_index(&mut self, current: usize, len: usize) -> usize {
        if len == 0 {
            return current;
        }

        if !self.enabled {
            return if current + 1 < len { current + 1 } else { 0 };
        }

        if self.permutation.len() == len {
            let following = self
                .permutation
                .iter()
                .position(|&i| i == current)
                .and_then(|pos| self.permutation.get(pos + 1));
            if let Some(&next) = following {
                return next;
            }
        }

        self.regenerate(len);
        self.permutation[0]
    }

    fn regenerate(&mut self, len: usize) {
        self.permutation = shuffled_indices(len, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn disabled_sequencer_walks_and_wraps() {
        let mut seq = ShuffleSequencer::seeded(1);
        assert_eq!(seq.next_index(0, 3), 1);
        assert_eq!(seq.next_index(1, 3), 2);
        assert_eq!(seq.next_index(2, 3), 0);
    }

    #[test]
    fn empty_playlist_returns_current() {
        let mut seq = ShuffleSequencer::seeded(1);
        assert_eq!(seq.next_index(4, 0), 4);

        seq.enable(0);
        assert_eq!(seq.next_index(4, 0), 4);
    }

    #[test]
    fn single_track_returns_same_index() {
        let mut seq = ShuffleSequencer::seeded(1);
        assert_eq!(seq.next_index(0, 1), 0);

        seq.enable(1);
        assert_eq!(seq.next_index(0, 1), 0);
    }

    #[test]
    fn enable_generates_full_permutation() {
        let mut seq = ShuffleSequencer::seeded(7);
        seq.enable(10);

        assert!(seq.is_enabled());
        let unique: HashSet<usize> = seq.permutation().iter().copied().collect();
        assert_eq!(unique, (0..10).collect());
    }

    #[test]
    fn disable_discards_permutation() {
        let mut seq = ShuffleSequencer::seeded(7);
        assert!(seq.toggle(5));
        assert!(!seq.toggle(5));
        assert!(seq.permutation().is_empty());
        assert_eq!(seq.next_index(4, 5), 0);
    }

    #[test]
    fn shuffled_next_follows_permutation() {
        let mut seq = ShuffleSequencer::seeded(42);
        seq.enable(6);
        let perm = seq.permutation().to_vec();

        for pair in perm.windows(2) {
            assert_eq!(seq.next_index(pair[0], 6), pair[1]);
        }
        assert_eq!(seq.permutation(), &perm[..]);
    }

    #[test]
    fn exhausted_permutation_regenerates() {
        let mut seq = ShuffleSequencer::seeded(42);
        seq.enable(6);
        let last = *seq.permutation().last().unwrap();

        let next = seq.next_index(last, 6);
        assert_eq!(next, seq.permutation()[0]);
        assert_eq!(seq.permutation().len(), 6);
    }

    #[test]
    fn unknown_index_regenerates_instead_of_failing() {
        let mut seq = ShuffleSequencer::seeded(3);
        seq.enable(4);

        let next = seq.next_index(99, 4);
        assert!(next < 4);
        assert_eq!(next, seq.permutation()[0]);
    }

    #[test]
    fn stale_permutation_is_regenerated_for_new_length() {
        let mut seq = ShuffleSequencer::seeded(3);
        seq.enable(3);

        let next = seq.next_index(0, 8);
        assert!(next < 8);
        assert_eq!(seq.permutation().len(), 8);
    }

    #[test]
    fn restored_flag_generates_on_first_use() {
        let mut seq = ShuffleSequencer::seeded(5);
        seq.restore(true);
        assert!(seq.is_enabled());
        assert!(seq.permutation().is_empty());

        let next = seq.next_index(0, 5);
        assert_eq!(seq.permutation().len(), 5);
        assert_eq!(next, seq.permutation()[0]);
    }

    #[test]
    fn shuffled_indices_are_fair() {
        // Each of the 6 permutations of 3 elements should show up
        let mut rng = StdRng::seed_from_u64(11);
        let seen: HashSet<Vec<usize>> = (0..600).map(|_| shuffled_indices(3, &mut rng)).collect();
        assert_eq!(seen.len(), 6);
    }
}
