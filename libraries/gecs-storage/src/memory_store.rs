use async_trait::async_trait;
use gecs_core::DurableStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory durable store
///
/// Nothing survives the process; used for tests and for front-ends that
/// persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> gecs_core::Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: &[u8]) -> gecs_core::Result<()> {
        self.blobs
            .write()
            .await
            .insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}
