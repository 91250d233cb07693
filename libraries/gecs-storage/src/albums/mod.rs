//! User album catalog
//!
//! Every mutation loads the whole collection, changes it, and saves it back.
//! Mutations fail without saving when the collection cannot be read.

use crate::{Result, StateStore, StorageError};
use gecs_core::types::{Album, AlbumId, Track};
use tracing::info;

/// Get all albums in creation order
pub async fn get_all(store: &StateStore) -> Vec<Album> {
    store.load_albums().await
}

/// Get album by ID
pub async fn get(store: &StateStore, id: &AlbumId) -> Option<Album> {
    store
        .load_albums()
        .await
        .into_iter()
        .find(|album| &album.id == id)
}

/// Create a new album and append it to the collection
pub async fn create(store: &StateStore, name: &str, tracks: Vec<Track>) -> Result<Album> {
    let album = Album::new(name, tracks)?;

    let mut albums = store.try_load_albums().await?;
    albums.push(album.clone());
    store.save_albums(&albums).await?;

    info!(
        "Created album {:?} ({}) with {} tracks",
        album.name,
        album.id,
        album.tracks.len()
    );
    Ok(album)
}

/// Replace the tracks of an album
pub async fn update_tracks(store: &StateStore, id: &AlbumId, tracks: Vec<Track>) -> Result<Album> {
    modify(store, id, |album| {
        album.set_tracks(tracks);
        Ok(())
    })
    .await
}

/// Rename an album
pub async fn rename(store: &StateStore, id: &AlbumId, name: &str) -> Result<Album> {
    modify(store, id, |album| Ok(album.rename(name)?)).await
}

/// Delete an album
pub async fn delete(store: &StateStore, id: &AlbumId) -> Result<()> {
    let mut albums = store.try_load_albums().await?;
    let before = albums.len();
    albums.retain(|album| &album.id != id);

    if albums.len() == before {
        return Err(StorageError::not_found("Album", id.as_str()));
    }

    store.save_albums(&albums).await?;
    info!("Deleted album {}", id);
    Ok(())
}

async fn modify<F>(store: &StateStore, id: &AlbumId, change: F) -> Result<Album>
where
    F: FnOnce(&mut Album) -> Result<()>,
{
    let mut albums = store.try_load_albums().await?;
    let album = albums
        .iter_mut()
        .find(|album| &album.id == id)
        .ok_or_else(|| StorageError::not_found("Album", id.as_str()))?;

    change(album)?;
    let updated = album.clone();
    store.save_albums(&albums).await?;
    Ok(updated)
}
