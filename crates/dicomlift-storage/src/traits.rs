use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File read failed: {0}")]
    ReadFailed(String),

    #[error("Storage configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Progress observer invoked with (bytes transferred, total bytes).
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Destination for study files.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// Uploads one file under the given key prefix and returns the object
    /// key. The progress observer, when present, is called after each
    /// completed part and once for a single-shot put.
    async fn upload_file(
        &self,
        path: &Path,
        prefix: &str,
        progress: Option<ProgressFn>,
    ) -> StorageResult<String>;
}
