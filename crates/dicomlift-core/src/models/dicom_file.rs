/// Attributes extracted from one DICOM file.
///
/// Optional attributes that are absent in the file are carried as empty
/// strings (or `None` for the instance number); the three instance UIDs are
/// always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DicomFileInfo {
    pub patient_name: String,
    pub patient_id: String,
    pub study_instance_uid: String,
    pub study_description: String,
    pub study_date: String,
    pub series_instance_uid: String,
    pub series_description: String,
    pub sop_instance_uid: String,
    pub instance_number: Option<i64>,
}
