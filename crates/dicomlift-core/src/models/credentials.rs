use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temporary STS credentials vended by the session-validation endpoint.
///
/// A denied session is represented by the empty record with expiration at the
/// Unix epoch, so it is always considered expired and never signs a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

impl StsCredentials {
    /// The unauthenticated sentinel: all fields empty, already expired.
    pub fn empty() -> Self {
        StsCredentials {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: String::new(),
            expiration: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty()
    }

    /// Projection used to sign S3 and HealthImaging requests.
    pub fn signing(&self) -> SigningCredentials {
        SigningCredentials {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
        }
    }
}

/// The subset of [`StsCredentials`] handed to AWS SDK clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl SigningCredentials {
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty()
    }
}
