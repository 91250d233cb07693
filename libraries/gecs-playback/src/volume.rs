//! Volume control with logarithmic scaling
//!
//! Provides human-perceptual volume control using dB scaling.
//! Volume range is 0-100%, mapped to -60 dB to 0 dB internally.

/// Loudness at 1%, in dB
pub const MIN_DB: f32 = -60.0;

/// Loudness at 100%, in dB
pub const MAX_DB: f32 = 0.0;

/// Convert a volume percentage to a linear amplitude
///
/// Formula: amplitude = 10^((MIN_DB + pct/100 * (MAX_DB - MIN_DB)) / 20)
/// - 0%   → exactly 0.0 (silence)
/// - 50%  → -30 dB → 0.0316
/// - 70%  → -18 dB → 0.126 (default)
/// - 100% →   0 dB → 1.0 (unity)
pub fn percentage_to_amplitude(percentage: f32) -> f32 {
    if percentage <= 0.0 {
        return 0.0;
    }

    let percentage = percentage.min(100.0);
    let db = MIN_DB + (percentage / 100.0) * (MAX_DB - MIN_DB);

    // Convert dB to linear gain: gain = 10^(dB/20)
    10.0_f32.powf(db / 20.0)
}

/// Volume controller with logarithmic scaling
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Cached linear amplitude
    amplitude: f32,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (0-100, clamped)
    pub fn new(level: u8) -> Self {
        let level = level.min(100);
        Self {
            level,
            amplitude: percentage_to_amplitude(f32::from(level)),
        }
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
        self.amplitude = percentage_to_amplitude(f32::from(self.level));
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Linear amplitude handed to the media engine
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Current loudness in dB
    ///
    /// Useful for debugging and display
    pub fn to_db(&self) -> f32 {
        if self.level == 0 {
            MIN_DB
        } else {
            20.0 * self.amplitude.log10()
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(gecs_core::AppState::DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(80);
        assert_eq!(vol.level(), 80);
        assert_eq!(Volume::default().level(), 70);
    }

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(50);
        vol.set_level(75);
        assert_eq!(vol.level(), 75);

        // Clamp to 100
        vol.set_level(150);
        assert_eq!(vol.level(), 100);
    }

    #[test]
    fn zero_percent_is_exact_silence() {
        assert_eq!(percentage_to_amplitude(0.0), 0.0);
        assert_eq!(Volume::new(0).amplitude(), 0.0);
    }

    #[test]
    fn amplitude_calculation() {
        assert!((percentage_to_amplitude(100.0) - 1.0).abs() < 1e-6);
        assert!((percentage_to_amplitude(50.0) - 0.0316).abs() < 0.001);
        assert!((percentage_to_amplitude(70.0) - 0.1259).abs() < 0.001);

        // 1% is -59.4 dB, not silence
        assert!(percentage_to_amplitude(1.0) > 0.0);
    }

    #[test]
    fn db_conversion() {
        assert!((Volume::new(100).to_db() - 0.0).abs() < 0.1);
        assert!((Volume::new(0).to_db() + 60.0).abs() < 0.1);
        assert!((Volume::new(50).to_db() + 30.0).abs() < 0.1);
    }

    proptest! {
        /// Property: amplitude grows strictly with the percentage
        #[test]
        fn amplitude_is_monotonic(a in 0u8..100) {
            let lower = percentage_to_amplitude(f32::from(a));
            let higher = percentage_to_amplitude(f32::from(a + 1));
            prop_assert!(higher > lower);
        }

        /// Property: amplitude stays within [0, 1]
        #[test]
        fn amplitude_is_bounded(pct in -50.0f32..250.0) {
            let amp = percentage_to_amplitude(pct);
            prop_assert!((0.0..=1.0).contains(&amp));
        }
    }
}
