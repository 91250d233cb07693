/// Domain types for Gecs Player
mod album;
mod app_state;
mod ids;
mod track;

pub use album::Album;
pub use app_state::{AppState, RepeatMode};
pub use ids::{AlbumId, TrackId};
pub use track::{AlbumCover, Track};
