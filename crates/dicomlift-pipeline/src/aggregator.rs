use std::path::PathBuf;
use std::sync::Arc;

use dicomlift_core::constants::AGGREGATION_CHUNK_SIZE;
use futures::future::join_all;

use crate::catalog::StudyCatalog;
use crate::parser::parse_dicom_file;

/// Counts for one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub files_seen: usize,
    pub files_parsed: usize,
    pub files_skipped: usize,
}

/// Builds the study tree from loose DICOM files, a chunk at a time.
pub struct StudyAggregator {
    catalog: Arc<StudyCatalog>,
}

impl StudyAggregator {
    pub fn new(catalog: Arc<StudyCatalog>) -> Self {
        StudyAggregator { catalog }
    }

    /// Parses files in fixed-size chunks. Files within a chunk are parsed
    /// concurrently on the blocking pool; after each chunk exactly one
    /// snapshot is published, followed by a cooperative yield. Unreadable
    /// files are logged and skipped without aborting the run.
    pub async fn organize_studies(&self, files: Vec<PathBuf>) -> AggregationSummary {
        let mut summary = AggregationSummary {
            files_seen: files.len(),
            ..AggregationSummary::default()
        };

        self.catalog.begin_processing();

        for chunk in files.chunks(AGGREGATION_CHUNK_SIZE) {
            let parses = chunk.iter().cloned().map(|path| {
                tokio::task::spawn_blocking(move || {
                    let info = parse_dicom_file(&path);
                    (path, info)
                })
            });

            for joined in join_all(parses).await {
                match joined {
                    Ok((path, Ok(info))) => {
                        self.catalog.merge(&info, path);
                        summary.files_parsed += 1;
                    }
                    Ok((path, Err(e))) => {
                        tracing::warn!(
                            error = %e,
                            file = %path.display(),
                            "Skipping unreadable DICOM file"
                        );
                        summary.files_skipped += 1;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "DICOM parse task failed");
                        summary.files_skipped += 1;
                    }
                }
            }

            self.catalog.publish();
            tokio::task::yield_now().await;
        }

        self.catalog.finish_processing();

        tracing::info!(
            files_seen = summary.files_seen,
            files_parsed = summary.files_parsed,
            files_skipped = summary.files_skipped,
            studies = self.catalog.snapshot().studies.len(),
            "Study aggregation finished"
        );

        summary
    }
}
