use crate::traits::{ObjectUploader, ProgressFn, StorageError, StorageResult};
use crate::transfer::{part_spans, TransferStrategy};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use dicomlift_core::constants::{DICOM_CONTENT_TYPE, PART_CONCURRENCY};
use dicomlift_core::SigningCredentials;
use futures::StreamExt;
use std::path::Path;

/// S3-backed study uploader signing with session credentials.
#[derive(Clone)]
pub struct S3StudyUploader {
    client: Client,
    bucket: String,
}

impl S3StudyUploader {
    /// Create a new S3StudyUploader instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region
    /// * `credentials` - session credentials vended by the validation endpoint
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible
    ///   providers (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        credentials: SigningCredentials,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        if credentials.is_empty() {
            return Err(StorageError::ConfigError(
                "Session credentials are empty".to_string(),
            ));
        }

        let session_token = if credentials.session_token.is_empty() {
            None
        } else {
            Some(credentials.session_token)
        };
        let provider = Credentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            session_token,
            None,
            "dicomlift-session",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .credentials_provider(provider)
            .load()
            .await;

        // Use path-style addressing for S3-compatible providers (required for MinIO, etc.)
        let client = if let Some(ref endpoint) = endpoint_url {
            let s3_config = aws_sdk_s3::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&config)
        };

        Ok(S3StudyUploader { client, bucket })
    }

    async fn put_single(
        &self,
        key: &str,
        data: Vec<u8>,
        progress: Option<ProgressFn>,
    ) -> StorageResult<()> {
        let size = data.len() as u64;
        let body = ByteStream::from(Bytes::from(data));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(DICOM_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        if let Some(ref progress) = progress {
            progress(size, size);
        }

        Ok(())
    }

    async fn put_multipart(
        &self,
        key: &str,
        data: Vec<u8>,
        progress: Option<ProgressFn>,
    ) -> StorageResult<()> {
        let total = data.len() as u64;
        let payload = Bytes::from(data);

        let create_result = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(DICOM_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to create multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let upload_id = create_result
            .upload_id()
            .ok_or_else(|| StorageError::UploadFailed("No upload ID returned from S3".to_string()))?
            .to_string();

        let mut uploads = futures::stream::iter(part_spans(total).into_iter().map(|span| {
            let client = self.client.clone();
            let bucket = self.bucket.clone();
            let key = key.to_string();
            let upload_id = upload_id.clone();
            let part = payload.slice(span.offset as usize..(span.offset + span.len) as usize);
            async move {
                let result = client
                    .upload_part()
                    .bucket(&bucket)
                    .key(&key)
                    .upload_id(&upload_id)
                    .part_number(span.part_number)
                    .body(ByteStream::from(part))
                    .send()
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            error = %e,
                            bucket = %bucket,
                            key = %key,
                            part_number = span.part_number,
                            "Failed to upload part"
                        );
                        StorageError::UploadFailed(e.to_string())
                    })?;

                let etag = result
                    .e_tag()
                    .ok_or_else(|| {
                        StorageError::UploadFailed(format!(
                            "No ETag returned for part {}",
                            span.part_number
                        ))
                    })?
                    .to_string();

                Ok::<_, StorageError>((span, etag))
            }
        }))
        .buffer_unordered(PART_CONCURRENCY);

        let mut parts = Vec::new();
        let mut transferred = 0u64;

        while let Some(result) = uploads.next().await {
            match result {
                Ok((span, etag)) => {
                    transferred += span.len;
                    if let Some(ref progress) = progress {
                        progress(transferred, total);
                    }
                    parts.push(
                        CompletedPart::builder()
                            .part_number(span.part_number)
                            .e_tag(etag)
                            .build(),
                    );
                }
                Err(e) => {
                    // Cancel in-flight parts, then abort so no orphaned
                    // parts accumulate in the bucket.
                    drop(uploads);
                    self.abort_multipart(key, &upload_id).await;
                    return Err(e);
                }
            }
        }

        parts.sort_by_key(|p| p.part_number());
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to complete multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        Ok(())
    }

    async fn abort_multipart(&self, key: &str, upload_id: &str) {
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
        {
            tracing::warn!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "Failed to abort multipart upload"
            );
        }
    }
}

/// Object key layout: `{prefix}/{filename}`, bare filename when the prefix
/// is empty.
fn object_key(prefix: &str, filename: &str) -> String {
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", prefix, filename)
    }
}

#[async_trait]
impl ObjectUploader for S3StudyUploader {
    async fn upload_file(
        &self,
        path: &Path,
        prefix: &str,
        progress: Option<ProgressFn>,
    ) -> StorageResult<String> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                StorageError::ReadFailed(format!("{} has no usable file name", path.display()))
            })?;
        let key = object_key(prefix, filename);

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        let size = data.len() as u64;

        let start = std::time::Instant::now();

        match TransferStrategy::for_size(size) {
            TransferStrategy::SingleShot => self.put_single(&key, data, progress).await?,
            TransferStrategy::Multipart => self.put_multipart(&key, data, progress).await?,
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(key)
    }
}
