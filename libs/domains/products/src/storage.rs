use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::ImageUpload;

/// Blob store for product images.
///
/// `store` persists the raw bytes and returns an opaque identifier that the
/// product record references from then on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, image: &ImageUpload) -> ProductResult<String>;
}

/// In-memory implementation of ImageStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryImageStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch stored bytes by identifier.
    pub async fn get(&self, id: &str) -> Option<Vec<u8>> {
        let blobs = self.blobs.read().await;
        blobs.get(id).cloned()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn store(&self, image: &ImageUpload) -> ProductResult<String> {
        let id = Uuid::now_v7().to_string();

        let mut blobs = self.blobs.write().await;
        blobs.insert(id.clone(), image.bytes.clone());

        tracing::debug!(
            image_id = %id,
            size = image.bytes.len(),
            file_name = image.file_name.as_deref().unwrap_or("-"),
            "Stored image"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_returns_unique_ids_and_keeps_bytes() {
        let store = InMemoryImageStore::new();

        let first = store
            .store(&ImageUpload {
                bytes: b"content1".to_vec(),
                ..Default::default()
            })
            .await
            .unwrap();
        let second = store
            .store(&ImageUpload {
                bytes: b"content2".to_vec(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get(&first).await.unwrap(), b"content1");
        assert_eq!(store.get(&second).await.unwrap(), b"content2");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = InMemoryImageStore::new();
        assert!(store.get("missing").await.is_none());
    }
}
