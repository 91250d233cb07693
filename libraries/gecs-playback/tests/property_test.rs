//! Property-based tests for shuffle sequencing and navigation

use gecs_core::{Track, TrackId};
use gecs_playback::{shuffled_indices, Navigator, ShuffleSequencer};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::path::PathBuf;

fn library(len: usize) -> Vec<Track> {
    (0..len)
        .map(|i| {
            Track::new(
                TrackId::new(format!("{i:08x}")),
                format!("Track {i}"),
                PathBuf::from(format!("/music/{i}.mp3")),
                PathBuf::from(format!("{i}.mp3")),
            )
        })
        .collect()
}

proptest! {
    /// Every generated permutation is a bijection on 0..len
    #[test]
    fn permutation_is_bijection(len in 0usize..200, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let perm = shuffled_indices(len, &mut rng);

        prop_assert_eq!(perm.len(), len);
        let unique: HashSet<usize> = perm.iter().copied().collect();
        prop_assert_eq!(unique.len(), len);
        prop_assert!(perm.iter().all(|&i| i < len));
    }

    /// Walking a shuffled pass visits each index exactly once
    #[test]
    fn shuffled_pass_never_repeats(len in 2usize..100, seed in any::<u64>()) {
        let mut seq = ShuffleSequencer::seeded(seed);
        seq.enable(len);
        let perm = seq.permutation().to_vec();

        let mut current = perm[0];
        let mut visited = vec![current];
        for _ in 1..len {
            current = seq.next_index(current, len);
            visited.push(current);
        }

        prop_assert_eq!(&visited, &perm);
        let unique: HashSet<usize> = visited.iter().copied().collect();
        prop_assert_eq!(unique.len(), len);
    }

    /// next_index always lands inside the playlist
    #[test]
    fn next_index_in_range(
        len in 1usize..50,
        currents in prop::collection::vec(0usize..80, 1..40),
        enabled in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut seq = ShuffleSequencer::seeded(seed);
        if enabled {
            seq.enable(len);
        }
        for current in currents {
            prop_assert!(seq.next_index(current, len) < len);
        }
    }

    /// Sequential next() applied N times from index 0 returns to index 0
    #[test]
    fn sequential_navigation_is_cyclic(len in 0usize..64) {
        let tracks = library(len);
        let mut seq = ShuffleSequencer::seeded(0);
        let mut nav = Navigator::new();
        nav.sync_to_playlist(&tracks);

        for _ in 0..len {
            nav.next(&tracks, &mut seq);
        }

        prop_assert_eq!(nav.current_index(), 0);
        prop_assert_eq!(nav.current_track().is_none(), len == 0);
    }

    /// previous() is the inverse of sequential next()
    #[test]
    fn previous_undoes_next(len in 2usize..40, start in 0usize..40) {
        let tracks = library(len);
        let start = start % len;
        let mut seq = ShuffleSequencer::seeded(0);
        let mut nav = Navigator::new();
        nav.select(&tracks, start);

        nav.next(&tracks, &mut seq);
        nav.previous(&tracks);

        prop_assert_eq!(nav.current_index(), start);
    }
}
