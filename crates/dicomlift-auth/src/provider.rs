use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use dicomlift_core::constants::CREDENTIAL_REFRESH_THRESHOLD;
use dicomlift_core::{AppConfig, SigningCredentials, StsCredentials};
use tokio::sync::Mutex;

use crate::error::AuthResult;
use crate::validator::{SessionGrant, SessionValidator};

struct CachedSession {
    credentials: Option<StsCredentials>,
    app_config: AppConfig,
}

/// Caches session credentials and refreshes them ahead of expiration.
///
/// Constructed once and shared by `Arc`. The cache lock is held across the
/// refresh call, so concurrent callers trigger at most one validation request
/// and all of them observe the refreshed value.
pub struct CredentialsProvider {
    validator: Arc<dyn SessionValidator>,
    cache: Mutex<CachedSession>,
}

impl CredentialsProvider {
    pub fn new(validator: Arc<dyn SessionValidator>) -> Self {
        CredentialsProvider {
            validator,
            cache: Mutex::new(CachedSession {
                credentials: None,
                app_config: AppConfig::default(),
            }),
        }
    }

    fn needs_refresh(credentials: &Option<StsCredentials>) -> bool {
        match credentials {
            Some(creds) => {
                let threshold =
                    ChronoDuration::seconds(CREDENTIAL_REFRESH_THRESHOLD.as_secs() as i64);
                Utc::now() >= creds.expiration - threshold
            }
            None => true,
        }
    }

    async fn refresh(&self, cache: &mut CachedSession) -> AuthResult<()> {
        match self.validator.validate().await? {
            SessionGrant::Authorized {
                credentials,
                app_config,
            } => {
                tracing::info!(expiration = %credentials.expiration, "Session credentials refreshed");
                cache.credentials = Some(credentials);
                cache.app_config = app_config;
            }
            SessionGrant::Denied => {
                tracing::warn!("Session validation denied, caching empty credentials");
                cache.credentials = Some(StsCredentials::empty());
            }
        }
        Ok(())
    }

    /// Returns cached credentials, refreshing them when within the expiration
    /// threshold. A denied session yields the empty, already-expired record.
    pub async fn get_credentials(&self) -> AuthResult<StsCredentials> {
        let mut cache = self.cache.lock().await;
        if Self::needs_refresh(&cache.credentials) {
            self.refresh(&mut cache).await?;
        }
        Ok(cache
            .credentials
            .clone()
            .unwrap_or_else(StsCredentials::empty))
    }

    /// Projection of [`Self::get_credentials`] for request signing.
    pub async fn get_signing_credentials(&self) -> AuthResult<SigningCredentials> {
        Ok(self.get_credentials().await?.signing())
    }

    /// Discards the cached session and fetches a fresh one.
    pub async fn force_refresh(&self) -> AuthResult<StsCredentials> {
        let mut cache = self.cache.lock().await;
        cache.credentials = None;
        self.refresh(&mut cache).await?;
        Ok(cache
            .credentials
            .clone()
            .unwrap_or_else(StsCredentials::empty))
    }

    /// Deployment parameters from the last successful validation, refreshing
    /// the session first when the cached credentials are stale.
    pub async fn get_app_config(&self) -> AuthResult<AppConfig> {
        let mut cache = self.cache.lock().await;
        if Self::needs_refresh(&cache.credentials) {
            self.refresh(&mut cache).await?;
        }
        Ok(cache.app_config.clone())
    }

    /// Probe reporting whether usable credentials can be obtained.
    pub async fn validate_credentials(&self) -> bool {
        match self.get_credentials().await {
            Ok(creds) => !creds.is_empty(),
            Err(_) => false,
        }
    }
}
