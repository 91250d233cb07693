//! Application state (volume, shuffle, repeat)

use crate::{Result, StateStore};
use gecs_core::AppState;

/// Get the persisted application state
///
/// Returns the default state if none exists or it cannot be read.
pub async fn get(store: &StateStore) -> AppState {
    store.load_state().await.unwrap_or_default()
}

/// Read-modify-write the whole state blob
///
/// Reads the current blob (or the default), applies `change`, and writes the
/// result back. Returns the state that was written.
pub async fn update<F>(store: &StateStore, change: F) -> Result<AppState>
where
    F: FnOnce(&mut AppState),
{
    let mut state = get(store).await;
    change(&mut state);
    store.save_state(&state).await?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use gecs_core::RepeatMode;
    use std::sync::Arc;

    fn store() -> StateStore {
        StateStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn get_defaults_when_empty() {
        assert_eq!(get(&store()).await, AppState::default());
    }

    #[tokio::test]
    async fn update_only_touches_changed_field() {
        let store = store();
        update(&store, |s| s.repeat_mode = RepeatMode::One)
            .await
            .unwrap();
        let state = update(&store, |s| s.volume = 33).await.unwrap();

        assert_eq!(state.volume, 33);
        assert_eq!(state.repeat_mode, RepeatMode::One);
        assert!(!state.shuffle);
        assert_eq!(get(&store).await, state);
    }
}
