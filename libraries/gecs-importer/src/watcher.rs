//! Filesystem watcher for the music folder
//!
//! Reports debounced changes to audio files so the library can be rescanned.
//! Watching stops when the [`LibraryWatcher`] is dropped.
//!
//! # Platform Support
//!
//! - Windows: `ReadDirectoryChangesW`
//! - macOS: `FSEvents`
//! - Linux: `inotify`

use crate::{scanner::is_audio_file, ImportError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Default debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Capacity of the notification channel
const CHANNEL_CAPACITY: usize = 64;

/// One debounced batch of changes to audio files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryChanged {
    /// Audio files that were created, modified, renamed or removed
    pub paths: Vec<PathBuf>,
}

/// Active watch on a music folder
pub struct LibraryWatcher {
    root: PathBuf,
    // The debouncer owns the watcher; dropping it stops watching
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl LibraryWatcher {
    /// Start watching `root` recursively
    ///
    /// Returns the guard together with the receiving end of the change
    /// notifications.
    pub fn start(
        root: &Path,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<LibraryChanged>)> {
        if !root.is_dir() {
            return Err(ImportError::FileNotFound(root.display().to_string()));
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let paths: Vec<PathBuf> = events
                        .iter()
                        .flat_map(|event| audio_paths(&event.event))
                        .collect();
                    if paths.is_empty() {
                        return;
                    }
                    debug!("Library changed: {:?}", paths);
                    // Receiver gone means nobody is listening any more
                    let _ = tx.blocking_send(LibraryChanged { paths });
                }
                Err(errors) => {
                    for error in errors {
                        error!("Watcher error: {:?}", error);
                    }
                }
            }
        })
        .map_err(|e| ImportError::Watcher(format!("Failed to create debouncer: {}", e)))?;

        debouncer
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| ImportError::Watcher(format!("Failed to watch path: {}", e)))?;

        info!("Started watching: {}", root.display());
        Ok((
            Self {
                root: root.to_path_buf(),
                _debouncer: debouncer,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for LibraryWatcher {
    fn drop(&mut self) {
        info!("Stopped watching: {}", self.root.display());
    }
}

/// Audio file paths touched by a filesystem event
fn audio_paths(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Other => {
            event
                .paths
                .iter()
                .filter(|p| is_audio_file(p))
                .cloned()
                .collect()
        }
        _ => Vec::new(),
    }
}
