use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("DICOM read failed: {0}")]
    DicomRead(String),

    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),
}
