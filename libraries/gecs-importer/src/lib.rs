//! Gecs Player Library Importer
//!
//! Everything that touches the music folder on disk.
//!
//! # Architecture
//!
//! - `scanner`: Finds supported audio files under a directory
//! - `metadata`: Tag, duration and cover art extraction
//! - `library_scanner`: [`DirectoryScanner`], the `LibraryScanner` used by the player
//! - `watcher`: Debounced change notifications for the music folder
//! - `fetcher`: [`HelperFetcher`], downloads through an external helper process

mod error;

pub mod fetcher;
pub mod library_scanner;
pub mod metadata;
pub mod scanner;
pub mod watcher;

pub use error::ImportError;
pub use fetcher::{is_supported_url, HelperFetcher};
pub use library_scanner::{remove_track_file, track_id_for_path, DirectoryScanner};
pub use watcher::{LibraryChanged, LibraryWatcher};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
