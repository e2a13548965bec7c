use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use dicomlift_core::{DicomFileInfo, Instance, Series, Study, StudyStatus};
use tokio::sync::watch;

/// Immutable view of the study tree handed to observers.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Increments on every publication.
    pub version: u64,
    pub studies: Vec<Study>,
    /// True while an aggregation run is in flight.
    pub processing: bool,
}

struct CatalogState {
    studies: Vec<Study>,
    processing: bool,
    version: u64,
}

/// Shared study tree.
///
/// Mutations go through the catalog under a short-held lock; observers
/// receive deep-cloned snapshots over a watch channel and never touch the
/// lock. Merges do not publish on their own, so the aggregator controls the
/// snapshot cadence.
pub struct StudyCatalog {
    state: Mutex<CatalogState>,
    publisher: watch::Sender<CatalogSnapshot>,
}

impl StudyCatalog {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(CatalogSnapshot::default());
        StudyCatalog {
            state: Mutex::new(CatalogState {
                studies: Vec::new(),
                processing: false,
                version: 0,
            }),
            publisher,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish_locked(&self, state: &mut CatalogState) {
        state.version += 1;
        self.publisher.send_replace(CatalogSnapshot {
            version: state.version,
            studies: state.studies.clone(),
            processing: state.processing,
        });
    }

    /// Observer handle; the receiver sees every published snapshot that it
    /// is fast enough to read, always ending on the latest.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.publisher.subscribe()
    }

    /// Publishes a fresh snapshot to observers.
    pub fn publish(&self) {
        let mut state = self.lock();
        self.publish_locked(&mut state);
    }

    /// Merges one parsed file into the tree, keyed by UID at all three
    /// levels. An instance already present is left untouched, so merging is
    /// idempotent and order-independent.
    pub fn merge(&self, info: &DicomFileInfo, file: PathBuf) {
        let mut state = self.lock();
        let studies = &mut state.studies;

        let study_idx = match studies
            .iter()
            .position(|s| s.study_instance_uid == info.study_instance_uid)
        {
            Some(idx) => idx,
            None => {
                studies.push(Study {
                    patient_name: info.patient_name.clone(),
                    patient_id: info.patient_id.clone(),
                    study_instance_uid: info.study_instance_uid.clone(),
                    study_description: info.study_description.clone(),
                    study_date: info.study_date.clone(),
                    series: Vec::new(),
                    checked: true,
                    status: StudyStatus::NotUploaded,
                });
                studies.len() - 1
            }
        };
        let study = &mut studies[study_idx];

        let series_idx = match study
            .series
            .iter()
            .position(|s| s.series_instance_uid == info.series_instance_uid)
        {
            Some(idx) => idx,
            None => {
                study.series.push(Series {
                    series_instance_uid: info.series_instance_uid.clone(),
                    series_description: info.series_description.clone(),
                    instances: Vec::new(),
                });
                study.series.len() - 1
            }
        };
        let series = &mut study.series[series_idx];

        if !series
            .instances
            .iter()
            .any(|i| i.instance_uid == info.sop_instance_uid)
        {
            series.instances.push(Instance {
                instance_uid: info.sop_instance_uid.clone(),
                instance_number: info.instance_number,
                file,
                uploaded: false,
            });
        }
    }

    /// Updates a study's status and publishes. A study that has reached
    /// `Completed` never regresses.
    pub fn set_status(&self, study_uid: &str, status: StudyStatus) {
        let mut state = self.lock();
        let Some(study) = state
            .studies
            .iter_mut()
            .find(|s| s.study_instance_uid == study_uid)
        else {
            return;
        };
        if study.status.is_terminal() {
            return;
        }
        study.status = status;
        self.publish_locked(&mut state);
    }

    /// Flips an instance's uploaded flag to true. Does not publish; status
    /// updates carry the snapshot.
    pub fn mark_uploaded(&self, study_uid: &str, instance_uid: &str) {
        let mut state = self.lock();
        if let Some(instance) = state
            .studies
            .iter_mut()
            .filter(|s| s.study_instance_uid == study_uid)
            .flat_map(|s| s.series.iter_mut())
            .flat_map(|s| s.instances.iter_mut())
            .find(|i| i.instance_uid == instance_uid)
        {
            instance.uploaded = true;
        }
    }

    /// Changes a study's upload selection and publishes.
    pub fn set_checked(&self, study_uid: &str, checked: bool) {
        let mut state = self.lock();
        if let Some(study) = state
            .studies
            .iter_mut()
            .find(|s| s.study_instance_uid == study_uid)
        {
            study.checked = checked;
            self.publish_locked(&mut state);
        }
    }

    /// Clones of the studies currently selected for upload.
    pub fn selected_studies(&self) -> Vec<Study> {
        self.lock()
            .studies
            .iter()
            .filter(|s| s.checked)
            .cloned()
            .collect()
    }

    /// Current tree without bumping the version.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.lock();
        CatalogSnapshot {
            version: state.version,
            studies: state.studies.clone(),
            processing: state.processing,
        }
    }

    pub fn version(&self) -> u64 {
        self.lock().version
    }

    pub fn is_processing(&self) -> bool {
        self.lock().processing
    }

    /// Marks an aggregation run as started and publishes.
    pub fn begin_processing(&self) {
        let mut state = self.lock();
        state.processing = true;
        self.publish_locked(&mut state);
    }

    /// Marks the aggregation run as finished and publishes the completion
    /// snapshot.
    pub fn finish_processing(&self) {
        let mut state = self.lock();
        state.processing = false;
        self.publish_locked(&mut state);
    }

    /// Discards the whole tree. Refused while an aggregation run is in
    /// flight; returns whether the reset happened.
    pub fn reset(&self) -> bool {
        let mut state = self.lock();
        if state.processing {
            return false;
        }
        state.studies.clear();
        self.publish_locked(&mut state);
        true
    }
}

impl Default for StudyCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(study: &str, series: &str, sop: &str) -> DicomFileInfo {
        DicomFileInfo {
            patient_name: "DOE^JANE".to_string(),
            patient_id: "P1".to_string(),
            study_instance_uid: study.to_string(),
            study_description: "CT CHEST".to_string(),
            study_date: "20260101".to_string(),
            series_instance_uid: series.to_string(),
            series_description: "AXIAL".to_string(),
            sop_instance_uid: sop.to_string(),
            instance_number: Some(1),
        }
    }

    #[test]
    fn test_merge_groups_by_uid() {
        let catalog = StudyCatalog::new();
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));
        catalog.merge(&info("st1", "se1", "i2"), PathBuf::from("b.dcm"));
        catalog.merge(&info("st1", "se2", "i3"), PathBuf::from("c.dcm"));
        catalog.merge(&info("st2", "se3", "i4"), PathBuf::from("d.dcm"));

        let studies = catalog.snapshot().studies;
        assert_eq!(studies.len(), 2);
        assert_eq!(studies[0].series.len(), 2);
        assert_eq!(studies[0].total_instances(), 3);
        assert!(studies[0].checked);
        assert_eq!(studies[0].status, StudyStatus::NotUploaded);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let catalog = StudyCatalog::new();
        for _ in 0..3 {
            catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));
        }
        assert_eq!(catalog.snapshot().studies[0].total_instances(), 1);
    }

    #[test]
    fn test_merge_preserves_uploaded_flag() {
        let catalog = StudyCatalog::new();
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));
        catalog.mark_uploaded("st1", "i1");
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));

        assert!(catalog.snapshot().studies[0].series[0].instances[0].uploaded);
    }

    #[test]
    fn test_status_never_regresses_from_completed() {
        let catalog = StudyCatalog::new();
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));
        catalog.set_status("st1", StudyStatus::Completed);
        catalog.set_status("st1", StudyStatus::Failed);

        assert_eq!(catalog.snapshot().studies[0].status, StudyStatus::Completed);
    }

    #[test]
    fn test_merge_does_not_publish() {
        let catalog = StudyCatalog::new();
        let before = catalog.version();
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));
        assert_eq!(catalog.version(), before);

        catalog.publish();
        assert_eq!(catalog.version(), before + 1);
    }

    #[test]
    fn test_reset_refused_while_processing() {
        let catalog = StudyCatalog::new();
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));

        catalog.begin_processing();
        assert!(!catalog.reset());
        assert_eq!(catalog.snapshot().studies.len(), 1);

        catalog.finish_processing();
        assert!(catalog.reset());
        assert!(catalog.snapshot().studies.is_empty());
    }

    #[test]
    fn test_selected_studies_honors_checked() {
        let catalog = StudyCatalog::new();
        catalog.merge(&info("st1", "se1", "i1"), PathBuf::from("a.dcm"));
        catalog.merge(&info("st2", "se2", "i2"), PathBuf::from("b.dcm"));
        catalog.set_checked("st1", false);

        let selected = catalog.selected_studies();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].study_instance_uid, "st2");
    }
}
