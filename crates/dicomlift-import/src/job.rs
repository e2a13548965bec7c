use chrono::{DateTime, SecondsFormat, Utc};

/// Parameters for one `StartDICOMImportJob` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJobRequest {
    pub datastore_id: String,
    pub data_access_role_arn: String,
    pub input_s3_uri: String,
    pub output_s3_uri: String,
    pub region: String,
}

/// Identifiers returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJobReceipt {
    pub job_id: String,
    pub job_name: String,
}

/// Timestamp-derived job name, generated fresh for every attempt.
pub fn job_name_now() -> String {
    job_name_at(Utc::now())
}

/// The UTC timestamp in RFC 3339 millisecond form with `-`, `:` and `.`
/// stripped, e.g. `20260806T101530123Z`.
fn job_name_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .filter(|c| !matches!(c, '-' | ':' | '.'))
        .collect()
}
