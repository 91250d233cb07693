/// Persisted application state
use serde::{de, Deserialize, Deserializer, Serialize};

/// Repeat mode for playback
///
/// Only affects what happens when a track ends; manual next/previous ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Advance to the next track
    #[default]
    Off,
    /// Advance to the next track, wrapping around
    All,
    /// Replay the current track
    One,
}

impl RepeatMode {
    /// Next mode in the Off → All → One → Off rotation
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application state persisted across restarts
///
/// Missing fields fall back to their defaults when read, so a partial blob
/// merges over [`AppState::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    /// Volume percentage (0-100)
    ///
    /// Fractional or out-of-range numbers are rounded and clamped on read.
    #[serde(deserialize_with = "deserialize_volume")]
    pub volume: u8,

    /// Whether shuffle is enabled
    pub shuffle: bool,

    /// Repeat mode
    pub repeat_mode: RepeatMode,
}

impl AppState {
    /// Default volume percentage
    pub const DEFAULT_VOLUME: u8 = 70;
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            volume: Self::DEFAULT_VOLUME,
            shuffle: false,
            repeat_mode: RepeatMode::Off,
        }
    }
}

fn deserialize_volume<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(de::Error::custom("volume must be a finite number"));
    }
    Ok(value.round().clamp(0.0, 100.0) as u8)
}
