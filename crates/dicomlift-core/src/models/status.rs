use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a study through upload and import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyStatus {
    NotUploaded,
    /// Upload in progress, with percent of pending files completed.
    Uploading(u8),
    ImportingToAhi,
    AhiImportSubmitted,
    AhiImportFailed,
    Completed,
    Failed,
}

impl StudyStatus {
    /// Terminal studies are skipped by subsequent upload runs.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StudyStatus::Completed)
    }
}

impl fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyStatus::NotUploaded => write!(f, "Not Uploaded"),
            StudyStatus::Uploading(percent) => write!(f, "Uploading ({}%)", percent),
            StudyStatus::ImportingToAhi => write!(f, "Importing to AHI"),
            StudyStatus::AhiImportSubmitted => write!(f, "AHI Import Submitted"),
            StudyStatus::AhiImportFailed => write!(f, "AHI Import Failed"),
            StudyStatus::Completed => write!(f, "Completed"),
            StudyStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        assert_eq!(StudyStatus::NotUploaded.to_string(), "Not Uploaded");
        assert_eq!(StudyStatus::Uploading(42).to_string(), "Uploading (42%)");
        assert_eq!(StudyStatus::ImportingToAhi.to_string(), "Importing to AHI");
        assert_eq!(
            StudyStatus::AhiImportSubmitted.to_string(),
            "AHI Import Submitted"
        );
        assert_eq!(StudyStatus::AhiImportFailed.to_string(), "AHI Import Failed");
        assert_eq!(StudyStatus::Completed.to_string(), "Completed");
        assert_eq!(StudyStatus::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_only_completed_is_terminal() {
        assert!(StudyStatus::Completed.is_terminal());
        assert!(!StudyStatus::Failed.is_terminal());
        assert!(!StudyStatus::AhiImportSubmitted.is_terminal());
        assert!(!StudyStatus::Uploading(100).is_terminal());
    }
}
