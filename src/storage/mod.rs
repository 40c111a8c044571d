//! Public object storage for generated illustrations.
//!
//! Objects are flat names (`hero-illustration-1718000000000.png`) inside one
//! bucket. Uploads overwrite an existing object of the same name. Every
//! object is readable by anyone through [`ObjectStore::public_url`].
//!
//! ## Layout
//!
//! ```text
//! local:  {root_dir}/{name}
//! s3:     s3://{bucket}/{prefix}/{name}
//! ```

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{StorageBackend, StorageConfig};

pub use local::LocalStorage;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Storage;

/// Trait for object storage backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Names of objects starting with `prefix`, sorted ascending.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Store `bytes` under `name`, replacing any existing object.
    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Public URL an object is served under.
    fn public_url(&self, name: &str) -> String;
}

/// Join a public base URL and an object key.
pub(crate) fn join_public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

/// Object names are flat; anything that could address outside the bucket is rejected.
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(AppError::storage(format!("invalid object name: {name:?}")));
    }
    Ok(())
}

/// Build the configured storage backend.
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Local => {
            log::info!("Using local storage at {}", config.root_dir.display());
            Ok(Arc::new(LocalStorage::new(
                &config.root_dir,
                &config.public_base_url,
            )))
        }
        #[cfg(feature = "s3")]
        StorageBackend::S3 => {
            log::info!("Using S3 storage s3://{}/{}", config.bucket, config.prefix);
            Ok(Arc::new(S3Storage::from_config(config).await))
        }
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => Err(AppError::config(
            "storage backend 's3' requires the 's3' feature",
        )),
    }
}
