//! Pipeline constants shared across crates.

use std::time::Duration;

/// Credentials are considered expired once now is within this window of
/// their expiration time.
pub const CREDENTIAL_REFRESH_THRESHOLD: Duration = Duration::from_secs(15 * 60);

/// Number of DICOM files parsed per aggregation chunk.
pub const AGGREGATION_CHUNK_SIZE: usize = 50;

/// Number of files uploaded concurrently within one study batch.
pub const UPLOAD_BATCH_SIZE: usize = 10;

/// Files larger than this are uploaded via S3 multipart.
pub const MULTIPART_THRESHOLD: u64 = 5 * 1024 * 1024; // 5MB

/// Size of each multipart part (minimum is 5MB except last part).
pub const PART_SIZE: u64 = 5 * 1024 * 1024; // 5MB per part

/// Maximum number of multipart parts in flight at once.
pub const PART_CONCURRENCY: usize = 5;

/// Maximum attempts for StartDICOMImportJob submission.
pub const IMPORT_MAX_ATTEMPTS: u32 = 10;

/// Fixed delay between import submission attempts.
pub const IMPORT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Content type for uploaded DICOM instances.
pub const DICOM_CONTENT_TYPE: &str = "application/dicom";
