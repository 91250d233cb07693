//! Gecs Player Storage
//!
//! Persisted application state and user albums for Gecs Player.
//!
//! Everything funnels through a [`DurableStore`](gecs_core::DurableStore):
//! the [`StateStore`] reads and replaces whole blobs, and never diffs.
//!
//! # Architecture
//!
//! - **Backends**: [`JsonFileStore`] (one JSON file per key) and [`MemoryStore`]
//! - **Vertical Slicing**: `app_state` and `albums` own their read-modify-write logic
//! - **Degrade, don't fail**: reads log and fall back to defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use gecs_storage::{app_state, FolderPaths, JsonFileStore, StateStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = FolderPaths::ensure(FolderPaths::default_base().unwrap())?;
//! let store = StateStore::new(Arc::new(JsonFileStore::new(&paths.base)));
//!
//! let state = app_state::update(&store, |s| s.volume = 40).await?;
//! assert_eq!(state.volume, 40);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod file_store;
mod memory_store;
mod paths;

// Vertical slices
pub mod albums;
pub mod app_state;

pub use context::{StateStore, ALBUMS_KEY, STATE_KEY};
pub use error::{Result, StorageError};
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use paths::{FolderPaths, APP_FOLDER_NAME, MUSIC_FOLDER_NAME};
