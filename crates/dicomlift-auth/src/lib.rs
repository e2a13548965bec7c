//! Session validation and credential caching.
//!
//! The viewer session is validated against the MedDream endpoint, which vends
//! temporary STS credentials together with the deployment configuration. The
//! [`CredentialsProvider`] caches both and refreshes them ahead of expiration.

pub mod error;
pub mod provider;
pub mod validator;

pub use error::{AuthError, AuthResult};
pub use provider::CredentialsProvider;
pub use validator::{HttpSessionValidator, SessionGrant, SessionValidator};
