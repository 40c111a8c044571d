//! In-memory object store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::storage::{ObjectStore, check_name, join_public_url};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Object store held in process memory. Contents are lost on restart.
#[derive(Debug)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    public_base_url: String,
    fail_uploads: bool,
}

impl MemoryStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            public_base_url: public_base_url.into(),
            fail_uploads: false,
        }
    }

    /// A store whose uploads always fail.
    pub fn failing(public_base_url: impl Into<String>) -> Self {
        Self {
            fail_uploads: true,
            ..Self::new(public_base_url)
        }
    }

    /// Bytes and content type of a stored object.
    pub async fn get(&self, name: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .lock()
            .await
            .get(name)
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        // BTreeMap keys iterate in sorted order.
        Ok(self
            .objects
            .lock()
            .await
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        check_name(name)?;
        if self.fail_uploads {
            return Err(AppError::storage("upload rejected"));
        }
        self.objects.lock().await.insert(
            name.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        join_public_url(&self.public_base_url, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_is_sorted() {
        let store = MemoryStore::new("http://x");
        store.upload("b.png", vec![1], "image/png").await.unwrap();
        store.upload("a.png", vec![2], "image/png").await.unwrap();
        assert_eq!(store.list("").await.unwrap(), vec!["a.png", "b.png"]);
        assert_eq!(store.get("a.png").await.unwrap().1, "image/png");
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::failing("http://x");
        assert!(store.upload("a.png", vec![], "image/png").await.is_err());
        assert_eq!(store.len().await, 0);
    }
}
