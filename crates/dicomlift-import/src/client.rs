use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_medicalimaging::config::Credentials;
use dicomlift_auth::CredentialsProvider;

use crate::error::{ImportError, ImportResult};
use crate::job::{job_name_now, ImportJobReceipt, ImportJobRequest};

/// One import submission attempt.
#[async_trait]
pub trait ImportJobStarter: Send + Sync {
    async fn start_import_job(&self, request: &ImportJobRequest)
        -> ImportResult<ImportJobReceipt>;
}

/// Submits HealthImaging import jobs, signing with credentials fetched at
/// call time so a session refreshed mid-retry is honored.
pub struct AhiJobClient {
    credentials: Arc<CredentialsProvider>,
}

impl AhiJobClient {
    pub fn new(credentials: Arc<CredentialsProvider>) -> Self {
        AhiJobClient { credentials }
    }
}

#[async_trait]
impl ImportJobStarter for AhiJobClient {
    async fn start_import_job(
        &self,
        request: &ImportJobRequest,
    ) -> ImportResult<ImportJobReceipt> {
        let signing = self
            .credentials
            .get_signing_credentials()
            .await
            .map_err(|e| ImportError::Credentials(e.to_string()))?;
        if signing.is_empty() {
            return Err(ImportError::Unauthenticated);
        }

        let session_token = if signing.session_token.is_empty() {
            None
        } else {
            Some(signing.session_token)
        };
        let provider = Credentials::new(
            signing.access_key_id,
            signing.secret_access_key,
            session_token,
            None,
            "dicomlift-session",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(request.region.clone()))
            .credentials_provider(provider)
            .load()
            .await;
        let client = aws_sdk_medicalimaging::Client::new(&config);

        let job_name = job_name_now();
        let output = client
            .start_dicom_import_job()
            .job_name(&job_name)
            .datastore_id(&request.datastore_id)
            .data_access_role_arn(&request.data_access_role_arn)
            .input_s3_uri(&request.input_s3_uri)
            .output_s3_uri(&request.output_s3_uri)
            .send()
            .await
            .map_err(|e| ImportError::RequestFailed(e.to_string()))?;

        Ok(ImportJobReceipt {
            job_id: output.job_id().to_string(),
            job_name,
        })
    }
}
