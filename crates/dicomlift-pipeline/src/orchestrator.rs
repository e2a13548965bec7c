use std::path::PathBuf;
use std::sync::Arc;

use dicomlift_auth::CredentialsProvider;
use dicomlift_core::constants::UPLOAD_BATCH_SIZE;
use dicomlift_core::{AppConfig, Study, StudyStatus};
use dicomlift_import::{DicomImporter, ImportJobRequest};
use dicomlift_storage::{ObjectUploader, UploaderFactory};
use futures::StreamExt;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::StudyCatalog;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Session is not authenticated")]
    Unauthenticated,

    #[error("Credential lookup failed: {0}")]
    Credentials(String),

    #[error("Uploader setup failed: {0}")]
    UploaderSetup(String),
}

#[derive(Debug, Error)]
enum StudyError {
    #[error("{failed} of {total} files failed to upload")]
    UploadsIncomplete { failed: usize, total: usize },
}

/// Upload pacing and failure policy.
///
/// With `strict_uploads` off, failed files are skipped and the import still
/// runs for whatever made it up; with it on, any failed file marks the study
/// `Failed` and the import is not triggered.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub batch_size: usize,
    pub strict_uploads: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        UploadPolicy {
            batch_size: UPLOAD_BATCH_SIZE,
            strict_uploads: false,
        }
    }
}

/// Per-run outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub studies_processed: usize,
    pub studies_skipped: usize,
    pub files_uploaded: usize,
    pub files_failed: usize,
    pub imports_submitted: usize,
    pub imports_failed: usize,
}

/// Walks the selected studies strictly in order: uploads each study's
/// pending instances in batches, then triggers the HealthImaging import for
/// that study before moving to the next.
pub struct UploadOrchestrator {
    credentials: Arc<CredentialsProvider>,
    catalog: Arc<StudyCatalog>,
    uploader_factory: Arc<dyn UploaderFactory>,
    importer: Arc<DicomImporter>,
    policy: UploadPolicy,
}

impl UploadOrchestrator {
    pub fn new(
        credentials: Arc<CredentialsProvider>,
        catalog: Arc<StudyCatalog>,
        uploader_factory: Arc<dyn UploaderFactory>,
        importer: Arc<DicomImporter>,
    ) -> Self {
        Self::with_policy(
            credentials,
            catalog,
            uploader_factory,
            importer,
            UploadPolicy::default(),
        )
    }

    pub fn with_policy(
        credentials: Arc<CredentialsProvider>,
        catalog: Arc<StudyCatalog>,
        uploader_factory: Arc<dyn UploaderFactory>,
        importer: Arc<DicomImporter>,
        policy: UploadPolicy,
    ) -> Self {
        UploadOrchestrator {
            credentials,
            catalog,
            uploader_factory,
            importer,
            policy,
        }
    }

    /// Uploads every selected study and triggers its import.
    ///
    /// The session is checked once up front: an unauthenticated session
    /// aborts the whole run before any upload or status change, so the shell
    /// can prompt for re-authentication. Per-file and per-study failures are
    /// contained and the loop continues.
    pub async fn upload_selected(&self) -> Result<UploadReport, OrchestratorError> {
        let signing = self
            .credentials
            .get_signing_credentials()
            .await
            .map_err(|e| OrchestratorError::Credentials(e.to_string()))?;
        if signing.is_empty() {
            tracing::warn!("Upload aborted: session is not authenticated");
            return Err(OrchestratorError::Unauthenticated);
        }
        let app_config = self
            .credentials
            .get_app_config()
            .await
            .map_err(|e| OrchestratorError::Credentials(e.to_string()))?;

        let uploader = self
            .uploader_factory
            .create(&app_config, signing)
            .await
            .map_err(|e| OrchestratorError::UploaderSetup(e.to_string()))?;

        let mut report = UploadReport::default();

        for study in self.catalog.selected_studies() {
            if study.status.is_terminal() {
                tracing::debug!(
                    study_uid = %study.study_instance_uid,
                    "Skipping completed study"
                );
                report.studies_skipped += 1;
                continue;
            }

            report.studies_processed += 1;
            if let Err(e) = self
                .process_study(&study, &app_config, uploader.clone(), &mut report)
                .await
            {
                tracing::error!(
                    error = %e,
                    study_uid = %study.study_instance_uid,
                    "Study upload failed"
                );
                self.catalog
                    .set_status(&study.study_instance_uid, StudyStatus::Failed);
            }
        }

        tracing::info!(
            studies_processed = report.studies_processed,
            studies_skipped = report.studies_skipped,
            files_uploaded = report.files_uploaded,
            files_failed = report.files_failed,
            imports_submitted = report.imports_submitted,
            imports_failed = report.imports_failed,
            "Upload run finished"
        );

        Ok(report)
    }

    async fn process_study(
        &self,
        study: &Study,
        app_config: &AppConfig,
        uploader: Arc<dyn ObjectUploader>,
        report: &mut UploadReport,
    ) -> Result<(), StudyError> {
        let study_uid = &study.study_instance_uid;

        // Fresh batch id per run; it is both the S3 key prefix and the
        // import path segment.
        let batch_id = Uuid::new_v4().to_string();

        let pending: Vec<(String, PathBuf)> = study
            .pending_instances()
            .into_iter()
            .map(|i| (i.instance_uid.clone(), i.file.clone()))
            .collect();

        if pending.is_empty() {
            self.catalog.set_status(study_uid, StudyStatus::Completed);
            return Ok(());
        }

        self.catalog.set_status(study_uid, StudyStatus::Uploading(0));

        let total = pending.len();
        let mut done = 0usize;
        let mut failed = 0usize;

        for batch in pending.chunks(self.policy.batch_size) {
            let mut uploads =
                futures::stream::iter(batch.iter().cloned().map(|(instance_uid, file)| {
                    let uploader = uploader.clone();
                    let prefix = batch_id.clone();
                    async move {
                        let result = uploader.upload_file(&file, &prefix, None).await;
                        (instance_uid, file, result)
                    }
                }))
                .buffer_unordered(self.policy.batch_size);

            while let Some((instance_uid, file, result)) = uploads.next().await {
                match result {
                    Ok(_key) => {
                        done += 1;
                        report.files_uploaded += 1;
                        self.catalog.mark_uploaded(study_uid, &instance_uid);
                        let percent = (done as f64 / total as f64 * 100.0).round() as u8;
                        self.catalog
                            .set_status(study_uid, StudyStatus::Uploading(percent));
                    }
                    Err(e) => {
                        failed += 1;
                        report.files_failed += 1;
                        tracing::warn!(
                            error = %e,
                            file = %file.display(),
                            study_uid = %study_uid,
                            "File upload failed"
                        );
                    }
                }
            }
        }

        if failed > 0 && self.policy.strict_uploads {
            return Err(StudyError::UploadsIncomplete { failed, total });
        }

        self.catalog
            .set_status(study_uid, StudyStatus::ImportingToAhi);

        let request = ImportJobRequest {
            datastore_id: app_config.datastore_id.clone(),
            data_access_role_arn: app_config.ahi_import_role_arn.clone(),
            input_s3_uri: format!("s3://{}/{}/", app_config.source_bucket_name, batch_id),
            output_s3_uri: format!("s3://{}/{}/", app_config.output_bucket_name, batch_id),
            region: app_config.region.clone(),
        };

        if self.importer.import_dicom_study(&request).await {
            report.imports_submitted += 1;
            self.catalog
                .set_status(study_uid, StudyStatus::AhiImportSubmitted);
        } else {
            report.imports_failed += 1;
            self.catalog
                .set_status(study_uid, StudyStatus::AhiImportFailed);
        }

        Ok(())
    }
}
