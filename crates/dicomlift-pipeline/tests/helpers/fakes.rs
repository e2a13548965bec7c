#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dicomlift_auth::{AuthResult, SessionGrant, SessionValidator};
use dicomlift_core::{AppConfig, DicomFileInfo, SigningCredentials, StsCredentials};
use dicomlift_import::{
    ImportError, ImportJobReceipt, ImportJobRequest, ImportJobStarter, ImportResult,
};
use dicomlift_storage::{
    ObjectUploader, ProgressFn, StorageError, StorageResult, UploaderFactory,
};

/// Session validator with a fixed outcome.
pub struct FakeValidator {
    granted: bool,
}

impl FakeValidator {
    pub fn granted() -> Arc<Self> {
        Arc::new(FakeValidator { granted: true })
    }

    pub fn denied() -> Arc<Self> {
        Arc::new(FakeValidator { granted: false })
    }
}

#[async_trait]
impl SessionValidator for FakeValidator {
    async fn validate(&self) -> AuthResult<SessionGrant> {
        if !self.granted {
            return Ok(SessionGrant::Denied);
        }
        Ok(SessionGrant::Authorized {
            credentials: StsCredentials {
                access_key_id: "ASIAFAKE".to_string(),
                secret_access_key: "secret".to_string(),
                session_token: "token".to_string(),
                expiration: Utc::now() + ChronoDuration::hours(1),
            },
            app_config: AppConfig {
                datastore_id: "ds-1".to_string(),
                source_bucket_name: "src-bucket".to_string(),
                output_bucket_name: "out-bucket".to_string(),
                ahi_import_role_arn: "arn:aws:iam::123456789012:role/import".to_string(),
                region: "us-east-1".to_string(),
            },
        })
    }
}

/// Counting uploader; files in `fail_files` always fail.
pub struct FakeUploader {
    calls: AtomicUsize,
    fail_files: HashSet<PathBuf>,
}

impl FakeUploader {
    pub fn new() -> Arc<Self> {
        Self::failing_on([])
    }

    pub fn failing_on(files: impl IntoIterator<Item = PathBuf>) -> Arc<Self> {
        Arc::new(FakeUploader {
            calls: AtomicUsize::new(0),
            fail_files: files.into_iter().collect(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectUploader for FakeUploader {
    async fn upload_file(
        &self,
        path: &Path,
        prefix: &str,
        _progress: Option<ProgressFn>,
    ) -> StorageResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_files.contains(path) {
            return Err(StorageError::UploadFailed(format!(
                "simulated failure: {}",
                path.display()
            )));
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed");
        Ok(format!("{}/{}", prefix, filename))
    }
}

/// Hands the orchestrator a pre-built fake uploader.
pub struct FakeUploaderFactory {
    uploader: Arc<FakeUploader>,
}

impl FakeUploaderFactory {
    pub fn new(uploader: Arc<FakeUploader>) -> Arc<Self> {
        Arc::new(FakeUploaderFactory { uploader })
    }
}

#[async_trait]
impl UploaderFactory for FakeUploaderFactory {
    async fn create(
        &self,
        _config: &AppConfig,
        _credentials: SigningCredentials,
    ) -> StorageResult<Arc<dyn ObjectUploader>> {
        Ok(self.uploader.clone())
    }
}

/// Import starter with a fixed outcome that records every request.
pub struct FakeStarter {
    succeed: bool,
    pub requests: Mutex<Vec<ImportJobRequest>>,
}

impl FakeStarter {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(FakeStarter {
            succeed: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(FakeStarter {
            succeed: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ImportJobStarter for FakeStarter {
    async fn start_import_job(
        &self,
        request: &ImportJobRequest,
    ) -> ImportResult<ImportJobReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        if self.succeed {
            Ok(ImportJobReceipt {
                job_id: "job-1".to_string(),
                job_name: "20260806T101530123Z".to_string(),
            })
        } else {
            Err(ImportError::RequestFailed("throttled".to_string()))
        }
    }
}

/// Attribute set for seeding the catalog without parsing files.
pub fn file_info(study: &str, series: &str, sop: &str) -> DicomFileInfo {
    DicomFileInfo {
        patient_name: "DOE^JANE".to_string(),
        patient_id: "P1".to_string(),
        study_instance_uid: study.to_string(),
        study_description: "CT CHEST".to_string(),
        study_date: "20260101".to_string(),
        series_instance_uid: series.to_string(),
        series_description: "AXIAL".to_string(),
        sop_instance_uid: sop.to_string(),
        instance_number: Some(1),
    }
}
