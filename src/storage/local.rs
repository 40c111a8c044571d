//! Local filesystem storage implementation.
//!
//! Used for development and by the standalone server, which serves
//! `root_dir` statically under the public base URL. Production deployments
//! should use `S3Storage`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{ObjectStore, check_name, join_public_url};

/// Distinguishes temp files of concurrent writes within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let path = self.path(name);
        let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp = self.path(&format!(".{name}.{}.{seq}.tmp", std::process::id()));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read an object, returning None if it doesn't exist.
    pub async fn read_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        check_name(name)?;
        match tokio::fs::read(self.path(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            // Skip in-flight temp files.
            if name.starts_with('.') {
                continue;
            }
            if name.starts_with(prefix) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        check_name(name)?;
        self.write_bytes(name, &bytes).await?;
        log::info!(
            "Stored {} ({} bytes, {}) in {}",
            name,
            bytes.len(),
            content_type,
            self.root_dir.display()
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
    use tempfile::TempDir;

    fn storage(tmp: &TempDir) -> LocalStorage {
        LocalStorage::new(tmp.path().join("illustrations"), "http://localhost/illustrations")
    }

    #[tokio::test]
    async fn test_upload_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        storage.upload("a.png", b"hello".to_vec(), "image/png").await.unwrap();
        let data = storage.read_bytes("a.png").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        storage.upload("a.png", b"one".to_vec(), "image/png").await.unwrap();
        storage.upload("a.png", b"two".to_vec(), "image/png").await.unwrap();
        assert_eq!(storage.read_bytes("a.png").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(storage.list("").await.unwrap(), vec!["a.png"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_of_same_name_all_succeed() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let handles: Vec<_> = (0..16u8)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .upload("hero-illustration-1.png", vec![i; 64], "image/png")
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(storage.list("").await.unwrap(), vec!["hero-illustration-1.png"]);
        let bytes = storage.read_bytes("hero-illustration-1.png").await.unwrap().unwrap();
        assert_eq!(bytes.len(), 64);
        assert!(bytes.iter().all(|b| *b == bytes[0]));
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        assert!(storage.read_bytes("nope.png").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(storage(&tmp).list("hero").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        for name in ["hero-illustration-2.png", "other.png", "hero-illustration-1.png"] {
            storage.upload(name, vec![0], "image/png").await.unwrap();
        }

        assert_eq!(
            storage.list("hero-illustration").await.unwrap(),
            vec!["hero-illustration-1.png", "hero-illustration-2.png"]
        );
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let err = storage(&tmp)
            .upload("../escape.png", vec![0], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_public_url() {
        let storage = LocalStorage::new("/tmp/x", "http://localhost/illustrations/");
        assert_eq!(
            storage.public_url("a.png"),
            "http://localhost/illustrations/a.png"
        );
    }
}
