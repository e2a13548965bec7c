use crate::{ObjectUploader, S3StudyUploader, StorageError, StorageResult};
use async_trait::async_trait;
use dicomlift_core::{AppConfig, SigningCredentials};
use std::sync::Arc;

/// Builds an uploader from the active deployment configuration and freshly
/// vended credentials. The orchestrator constructs one uploader per run so
/// every run signs with current credentials.
#[async_trait]
pub trait UploaderFactory: Send + Sync {
    async fn create(
        &self,
        config: &AppConfig,
        credentials: SigningCredentials,
    ) -> StorageResult<Arc<dyn ObjectUploader>>;
}

/// Factory for the S3-backed uploader targeting the source bucket.
#[derive(Debug, Clone, Default)]
pub struct S3UploaderFactory {
    /// Custom endpoint for S3-compatible providers.
    pub endpoint_url: Option<String>,
}

impl S3UploaderFactory {
    pub fn new(endpoint_url: Option<String>) -> Self {
        S3UploaderFactory { endpoint_url }
    }
}

#[async_trait]
impl UploaderFactory for S3UploaderFactory {
    async fn create(
        &self,
        config: &AppConfig,
        credentials: SigningCredentials,
    ) -> StorageResult<Arc<dyn ObjectUploader>> {
        if config.source_bucket_name.is_empty() {
            return Err(StorageError::ConfigError(
                "Source bucket is not configured".to_string(),
            ));
        }
        if config.region.is_empty() {
            return Err(StorageError::ConfigError(
                "Region is not configured".to_string(),
            ));
        }

        let uploader = S3StudyUploader::new(
            config.source_bucket_name.clone(),
            config.region.clone(),
            credentials,
            self.endpoint_url.clone(),
        )
        .await?;

        Ok(Arc::new(uploader))
    }
}
