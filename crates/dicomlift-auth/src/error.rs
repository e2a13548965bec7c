use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid validation response: {0}")]
    InvalidResponse(String),

    #[error("Auth configuration error: {0}")]
    ConfigError(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
