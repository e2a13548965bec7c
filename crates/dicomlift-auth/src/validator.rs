use async_trait::async_trait;
use dicomlift_core::{AppConfig, StsCredentials};
use serde::Deserialize;

use crate::error::{AuthError, AuthResult};

/// Outcome of a session-validation call.
///
/// A denied session is a normal outcome, not an error; only transport and
/// decoding failures surface as [`AuthError`].
#[derive(Debug, Clone)]
pub enum SessionGrant {
    Authorized {
        credentials: StsCredentials,
        app_config: AppConfig,
    },
    Denied,
}

/// Validates the active viewer session and vends temporary credentials.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self) -> AuthResult<SessionGrant>;
}

#[derive(Debug, Deserialize)]
struct ValidationPayload {
    #[serde(rename = "Credentials")]
    credentials: StsCredentials,
    #[serde(default)]
    app_config: AppConfig,
}

/// Session validator backed by the MedDream validation endpoint.
pub struct HttpSessionValidator {
    client: reqwest::Client,
    validate_url: String,
    session_cookie: String,
}

impl HttpSessionValidator {
    pub fn new(validate_url: String, session_cookie: String) -> Self {
        HttpSessionValidator {
            client: reqwest::Client::new(),
            validate_url,
            session_cookie,
        }
    }
}

#[async_trait]
impl SessionValidator for HttpSessionValidator {
    async fn validate(&self) -> AuthResult<SessionGrant> {
        let response = self
            .client
            .get(&self.validate_url)
            .header(reqwest::header::COOKIE, &self.session_cookie)
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %self.validate_url, "Session validation denied");
            return Ok(SessionGrant::Denied);
        }

        let payload: ValidationPayload = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            expiration = %payload.credentials.expiration,
            datastore_id = %payload.app_config.datastore_id,
            "Session validated"
        );

        Ok(SessionGrant::Authorized {
            credentials: payload.credentials,
            app_config: payload.app_config,
        })
    }
}
