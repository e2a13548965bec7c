//! Object storage for study uploads.
//!
//! Files at or below the multipart threshold go up in a single `PutObject`;
//! larger payloads use S3 multipart with a bounded number of parts in flight.

pub mod factory;
pub mod s3;
pub mod traits;
pub mod transfer;

pub use factory::{S3UploaderFactory, UploaderFactory};
pub use s3::S3StudyUploader;
pub use traits::{ObjectUploader, ProgressFn, StorageError, StorageResult};
pub use transfer::{part_spans, PartSpan, TransferStrategy};
