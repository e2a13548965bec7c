//! DICOM upload CLI for AWS HealthImaging.
//!
//! Set DICOMLIFT_VALIDATE_URL and DICOMLIFT_SESSION_COOKIE (or pass
//! --validate-url / --cookie) to authenticate against the MedDream session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dicomlift_auth::{CredentialsProvider, HttpSessionValidator};
use dicomlift_cli::{init_tracing, render_study_table};
use dicomlift_import::{AhiJobClient, DicomImporter};
use dicomlift_pipeline::{
    OrchestratorError, StudyAggregator, StudyCatalog, UploadOrchestrator, UploadPolicy,
};
use dicomlift_storage::S3UploaderFactory;

#[derive(Parser)]
#[command(name = "dicomlift", about = "DICOM study uploader for AWS HealthImaging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and print the aggregated study table
    Scan {
        /// Directory to scan recursively for DICOM files
        dir: PathBuf,
    },
    /// Scan a directory, upload the selected studies, and trigger imports
    Upload {
        /// Directory to scan recursively for DICOM files
        dir: PathBuf,
        /// Study instance UID to upload (repeatable; default: every study)
        #[arg(long)]
        study: Vec<String>,
        /// Mark a study failed when any of its files fails to upload
        #[arg(long)]
        strict: bool,
        /// Custom S3 endpoint for S3-compatible providers
        #[arg(long)]
        endpoint: Option<String>,
        /// Session cookie sent to the validation endpoint
        #[arg(long)]
        cookie: Option<String>,
        /// Session validation URL
        #[arg(long)]
        validate_url: Option<String>,
    },
}

fn collect_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

async fn aggregate(dir: &Path, catalog: Arc<StudyCatalog>) -> anyhow::Result<()> {
    let files = collect_files(dir);
    if files.is_empty() {
        anyhow::bail!("No files found under {}", dir.display());
    }

    let aggregator = StudyAggregator::new(catalog.clone());
    let summary = aggregator.organize_studies(files).await;

    println!(
        "Scanned {} files: {} parsed, {} skipped\n",
        summary.files_seen, summary.files_parsed, summary.files_skipped
    );
    print!("{}", render_study_table(&catalog.snapshot().studies));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { dir } => {
            let catalog = Arc::new(StudyCatalog::new());
            aggregate(&dir, catalog).await?;
        }
        Commands::Upload {
            dir,
            study,
            strict,
            endpoint,
            cookie,
            validate_url,
        } => {
            let validate_url = validate_url
                .or_else(|| std::env::var("DICOMLIFT_VALIDATE_URL").ok())
                .context("Set DICOMLIFT_VALIDATE_URL or pass --validate-url")?;
            let cookie = cookie
                .or_else(|| std::env::var("DICOMLIFT_SESSION_COOKIE").ok())
                .context("Set DICOMLIFT_SESSION_COOKIE or pass --cookie")?;

            let catalog = Arc::new(StudyCatalog::new());
            aggregate(&dir, catalog.clone()).await?;

            if !study.is_empty() {
                for existing in catalog.snapshot().studies {
                    let keep = study.contains(&existing.study_instance_uid);
                    catalog.set_checked(&existing.study_instance_uid, keep);
                }
            }

            let validator = Arc::new(HttpSessionValidator::new(validate_url, cookie));
            let credentials = Arc::new(CredentialsProvider::new(validator));
            let uploader_factory = Arc::new(S3UploaderFactory::new(endpoint));
            let starter = Arc::new(AhiJobClient::new(credentials.clone()));
            let importer = Arc::new(DicomImporter::new(starter));

            let orchestrator = UploadOrchestrator::with_policy(
                credentials,
                catalog.clone(),
                uploader_factory,
                importer,
                UploadPolicy {
                    strict_uploads: strict,
                    ..UploadPolicy::default()
                },
            );

            match orchestrator.upload_selected().await {
                Ok(report) => {
                    println!(
                        "\nUploaded {} files ({} failed) across {} studies; {} imports submitted, {} failed\n",
                        report.files_uploaded,
                        report.files_failed,
                        report.studies_processed,
                        report.imports_submitted,
                        report.imports_failed
                    );
                    print!("{}", render_study_table(&catalog.snapshot().studies));
                }
                Err(OrchestratorError::Unauthenticated) => {
                    eprintln!(
                        "Your MedDream session has expired. Sign in to the viewer again, \
                         then re-run the upload."
                    );
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
