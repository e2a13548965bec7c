use std::sync::Arc;
use std::time::Duration;

use dicomlift_core::constants::{IMPORT_MAX_ATTEMPTS, IMPORT_RETRY_DELAY};

use crate::client::ImportJobStarter;
use crate::job::ImportJobRequest;

/// Retry pacing for import submission. Injectable so tests can shrink the
/// delay; the defaults are the production contract.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: IMPORT_MAX_ATTEMPTS,
            retry_delay: IMPORT_RETRY_DELAY,
        }
    }
}

/// Drives import submission attempts until one succeeds or the ceiling is
/// exhausted.
pub struct DicomImporter {
    starter: Arc<dyn ImportJobStarter>,
    policy: RetryPolicy,
}

impl DicomImporter {
    pub fn new(starter: Arc<dyn ImportJobStarter>) -> Self {
        Self::with_policy(starter, RetryPolicy::default())
    }

    pub fn with_policy(starter: Arc<dyn ImportJobStarter>, policy: RetryPolicy) -> Self {
        DicomImporter { starter, policy }
    }

    /// Submits the import job, sleeping the fixed delay between failed
    /// attempts. Returns `true` on the first successful submission and
    /// `false` only once every attempt has failed.
    pub async fn import_dicom_study(&self, request: &ImportJobRequest) -> bool {
        for attempt in 1..=self.policy.max_attempts {
            match self.starter.start_import_job(request).await {
                Ok(receipt) => {
                    tracing::info!(
                        job_id = %receipt.job_id,
                        job_name = %receipt.job_name,
                        attempt,
                        input_s3_uri = %request.input_s3_uri,
                        "DICOM import job submitted"
                    );
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        input_s3_uri = %request.input_s3_uri,
                        "DICOM import attempt failed"
                    );
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        tracing::error!(
            datastore_id = %request.datastore_id,
            input_s3_uri = %request.input_s3_uri,
            "DICOM import failed after exhausting retries"
        );
        false
    }
}
