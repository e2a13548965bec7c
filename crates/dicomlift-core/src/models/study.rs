use std::path::PathBuf;

use super::status::StudyStatus;

/// One imaging study, grouping series by UID.
#[derive(Debug, Clone, PartialEq)]
pub struct Study {
    pub patient_name: String,
    pub patient_id: String,
    pub study_instance_uid: String,
    pub study_description: String,
    pub study_date: String,
    pub series: Vec<Series>,
    /// Whether the study is selected for upload.
    pub checked: bool,
    pub status: StudyStatus,
}

impl Study {
    pub fn total_instances(&self) -> usize {
        self.series.iter().map(|s| s.instances.len()).sum()
    }

    /// Instances not yet uploaded, across all series.
    pub fn pending_instances(&self) -> Vec<&Instance> {
        self.series
            .iter()
            .flat_map(|s| s.instances.iter())
            .filter(|i| !i.uploaded)
            .collect()
    }
}

/// One series within a study.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub series_instance_uid: String,
    pub series_description: String,
    pub instances: Vec<Instance>,
}

/// One SOP instance, backed by a file on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub instance_uid: String,
    pub instance_number: Option<i64>,
    pub file: PathBuf,
    /// Flips false to true once and never back.
    pub uploaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(uid: &str, uploaded: bool) -> Instance {
        Instance {
            instance_uid: uid.to_string(),
            instance_number: None,
            file: PathBuf::from(format!("{}.dcm", uid)),
            uploaded,
        }
    }

    #[test]
    fn test_counts_across_series() {
        let study = Study {
            patient_name: "DOE^JANE".to_string(),
            patient_id: "P1".to_string(),
            study_instance_uid: "1.2.3".to_string(),
            study_description: String::new(),
            study_date: "20260101".to_string(),
            series: vec![
                Series {
                    series_instance_uid: "1.2.3.1".to_string(),
                    series_description: String::new(),
                    instances: vec![instance("a", true), instance("b", false)],
                },
                Series {
                    series_instance_uid: "1.2.3.2".to_string(),
                    series_description: String::new(),
                    instances: vec![instance("c", false)],
                },
            ],
            checked: true,
            status: StudyStatus::NotUploaded,
        };

        assert_eq!(study.total_instances(), 3);
        let pending = study.pending_instances();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|i| !i.uploaded));
    }
}
