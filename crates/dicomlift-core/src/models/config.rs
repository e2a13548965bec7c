use serde::{Deserialize, Serialize};

/// Deployment parameters delivered alongside credentials by the
/// session-validation endpoint.
///
/// Defaults to empty strings before the first successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub datastore_id: String,
    pub source_bucket_name: String,
    pub output_bucket_name: String,
    pub ahi_import_role_arn: String,
    pub region: String,
}
