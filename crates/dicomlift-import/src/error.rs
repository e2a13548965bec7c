use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import job request failed: {0}")]
    RequestFailed(String),

    #[error("Session is not authenticated")]
    Unauthenticated,

    #[error("Credential lookup failed: {0}")]
    Credentials(String),
}

pub type ImportResult<T> = Result<T, ImportError>;
