//! HealthImaging import job submission.
//!
//! One submission attempt is a `StartDICOMImportJob` call; the importer wraps
//! attempts in a fixed-delay retry loop with a hard ceiling.

pub mod client;
pub mod error;
pub mod importer;
pub mod job;

pub use client::{AhiJobClient, ImportJobStarter};
pub use error::{ImportError, ImportResult};
pub use importer::{DicomImporter, RetryPolicy};
pub use job::{ImportJobReceipt, ImportJobRequest};
