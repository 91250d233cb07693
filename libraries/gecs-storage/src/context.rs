use crate::error::Result;
use gecs_core::{types::Album, AppState, DurableStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key of the persisted application state blob
pub const STATE_KEY: &str = "app-state.json";

/// Key of the persisted album collection
pub const ALBUMS_KEY: &str = "albums.json";

/// Persisted state store
///
/// Loads and saves the application state blob and the album collection
/// through a [`DurableStore`]. Saves always overwrite the whole blob.
#[derive(Clone)]
pub struct StateStore {
    store: Arc<dyn DurableStore>,
}

impl StateStore {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &Arc<dyn DurableStore> {
        &self.store
    }

    /// Load the application state
    ///
    /// Returns `None` when nothing was saved yet, when the store cannot be
    /// read, or when the saved blob is malformed. Missing fields are filled
    /// from [`AppState::default`].
    pub async fn load_state(&self) -> Option<AppState> {
        let blob = match self.store.get(STATE_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("No saved app state");
                return None;
            }
            Err(e) => {
                warn!("Failed to read app state: {}", e);
                return None;
            }
        };

        match serde_json::from_slice::<AppState>(&blob) {
            Ok(state) => {
                debug!("Loaded app state: {:?}", state);
                Some(state)
            }
            Err(e) => {
                warn!("Ignoring malformed app state: {}", e);
                None
            }
        }
    }

    /// Overwrite the persisted application state
    pub async fn save_state(&self, state: &AppState) -> Result<()> {
        let blob = serde_json::to_vec_pretty(state)?;
        self.store.set(STATE_KEY, &blob).await?;
        debug!("Saved app state: {:?}", state);
        Ok(())
    }

    /// Load all albums, degrading to an empty list
    ///
    /// Returns an empty list when nothing was saved, the store cannot be read,
    /// or the saved collection is malformed.
    pub async fn load_albums(&self) -> Vec<Album> {
        match self.try_load_albums().await {
            Ok(albums) => albums,
            Err(e) => {
                warn!("Failed to load albums: {}", e);
                Vec::new()
            }
        }
    }

    /// Load all albums, reporting read and parse failures
    ///
    /// Only a collection that was never saved yields an empty list. Used by
    /// mutations, which must not overwrite a collection they could not read.
    pub async fn try_load_albums(&self) -> Result<Vec<Album>> {
        let Some(blob) = self.store.get(ALBUMS_KEY).await? else {
            return Ok(Vec::new());
        };
        let albums: Vec<Album> = serde_json::from_slice(&blob)?;
        debug!("Loaded {} albums", albums.len());
        Ok(albums)
    }

    /// Overwrite the persisted album collection
    pub async fn save_albums(&self, albums: &[Album]) -> Result<()> {
        let blob = serde_json::to_vec_pretty(albums)?;
        self.store.set(ALBUMS_KEY, &blob).await?;
        debug!("Saved {} albums", albums.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use gecs_core::RepeatMode;

    fn store() -> (Arc<MemoryStore>, StateStore) {
        let backend = Arc::new(MemoryStore::new());
        (backend.clone(), StateStore::new(backend))
    }

    #[tokio::test]
    async fn missing_state_is_absent() {
        let (_, store) = store();
        assert_eq!(store.load_state().await, None);
    }

    #[tokio::test]
    async fn save_then_load_state() {
        let (_, store) = store();
        let state = AppState {
            volume: 12,
            shuffle: true,
            repeat_mode: RepeatMode::All,
        };

        store.save_state(&state).await.unwrap();
        assert_eq!(store.load_state().await, Some(state));
    }

    #[tokio::test]
    async fn malformed_state_is_treated_as_absent() {
        let (backend, store) = store();
        backend.set(STATE_KEY, b"{not json").await.unwrap();
        assert_eq!(store.load_state().await, None);

        backend
            .set(STATE_KEY, br#"{"repeatMode": "sometimes"}"#)
            .await
            .unwrap();
        assert_eq!(store.load_state().await, None);
    }

    #[tokio::test]
    async fn fractional_volume_keeps_other_settings() {
        let (backend, store) = store();
        backend
            .set(
                STATE_KEY,
                br#"{"volume": 63.48, "shuffle": true, "repeatMode": "all"}"#,
            )
            .await
            .unwrap();

        let state = store.load_state().await.unwrap();
        assert_eq!(state.volume, 63);
        assert!(state.shuffle);
        assert_eq!(state.repeat_mode, RepeatMode::All);
    }

    #[tokio::test]
    async fn try_load_albums_separates_absent_from_malformed() {
        let (backend, store) = store();
        assert!(store.try_load_albums().await.unwrap().is_empty());

        backend.set(ALBUMS_KEY, b"[{]").await.unwrap();
        assert!(matches!(
            store.try_load_albums().await,
            Err(crate::StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn missing_albums_are_empty() {
        let (backend, store) = store();
        assert!(store.load_albums().await.is_empty());

        backend.set(ALBUMS_KEY, b"[{]").await.unwrap();
        assert!(store.load_albums().await.is_empty());
    }
}
