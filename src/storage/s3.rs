//! AWS S3 storage implementation.
//!
//! Objects live at `{bucket}/{prefix}/{name}`; the bucket is expected to be
//! publicly readable under `public_base_url`.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::models::StorageConfig;
use crate::storage::{ObjectStore, check_name, join_public_url};

/// S3-backed object store.
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
    public_base_url: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(
        client: Client,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into().trim_matches('/').to_string(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Create S3 storage with credentials from the AWS environment.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(
            Client::new(&aws),
            &config.bucket,
            &config.prefix,
            &config.public_base_url,
        )
    }

    fn key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }

    fn name_of<'k>(&self, key: &'k str) -> &'k str {
        if self.prefix.is_empty() {
            key
        } else {
            key.strip_prefix(&self.prefix)
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(key)
        }
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let key_prefix = self.key(prefix);
        let mut names = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&key_prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| AppError::storage(e.into_service_error()))?;

            names.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(|key| self.name_of(key).to_string()),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        names.sort();
        Ok(names)
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        check_name(name)?;
        let key = self.key(name);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::storage(e.into_service_error()))?;

        log::info!("Wrote {} bytes to s3://{}/{}", size, self.bucket, key);
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        join_public_url(&self.public_base_url, &self.key(name))
    }
}
