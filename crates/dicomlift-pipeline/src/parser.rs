use std::path::Path;

use dicom_object::{open_file, DefaultDicomObject};
use dicomlift_core::DicomFileInfo;

use crate::error::PipelineError;

/// Extracts the attributes the aggregator needs from one DICOM file.
///
/// Descriptions, patient fields, and the instance number default to empty
/// when absent; a missing study, series, or SOP instance UID is an error.
pub fn parse_dicom_file(path: &Path) -> Result<DicomFileInfo, PipelineError> {
    let obj = open_file(path)
        .map_err(|e| PipelineError::DicomRead(format!("{}: {}", path.display(), e)))?;

    let study_instance_uid = required_str(&obj, "StudyInstanceUID")?;
    let series_instance_uid = required_str(&obj, "SeriesInstanceUID")?;
    let sop_instance_uid = required_str(&obj, "SOPInstanceUID")?;

    Ok(DicomFileInfo {
        patient_name: optional_str(&obj, "PatientName"),
        patient_id: optional_str(&obj, "PatientID"),
        study_instance_uid,
        study_description: optional_str(&obj, "StudyDescription"),
        study_date: optional_str(&obj, "StudyDate"),
        series_instance_uid,
        series_description: optional_str(&obj, "SeriesDescription"),
        sop_instance_uid,
        instance_number: optional_int(&obj, "InstanceNumber"),
    })
}

fn required_str(obj: &DefaultDicomObject, name: &'static str) -> Result<String, PipelineError> {
    let value = obj
        .element_by_name(name)
        .map_err(|_| PipelineError::MissingAttribute(name))?
        .to_str()
        .map_err(|_| PipelineError::MissingAttribute(name))?
        .trim()
        .to_string();
    if value.is_empty() {
        return Err(PipelineError::MissingAttribute(name));
    }
    Ok(value)
}

fn optional_str(obj: &DefaultDicomObject, name: &str) -> String {
    obj.element_by_name(name)
        .ok()
        .and_then(|e| e.to_str().ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn optional_int(obj: &DefaultDicomObject, name: &str) -> Option<i64> {
    obj.element_by_name(name)
        .ok()
        .and_then(|e| e.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
}
