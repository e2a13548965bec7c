#![allow(dead_code)]

use std::path::Path;

use dicom_core::header::DataElement;
use dicom_core::value::PrimitiveValue;
use dicom_core::{Tag, VR};
use dicom_dictionary_std::uids;
use dicom_object::meta::FileMetaTableBuilder;
use dicom_object::InMemDicomObject;

/// Writes a minimal Part-10 secondary-capture file carrying the identifiers
/// the aggregator reads.
pub fn write_test_dicom(
    path: &Path,
    study_uid: &str,
    series_uid: &str,
    sop_uid: &str,
    instance_number: i64,
) {
    let mut obj = InMemDicomObject::new_empty();
    let put = |o: &mut InMemDicomObject, tag: Tag, vr: VR, value: PrimitiveValue| {
        o.put(DataElement::new(tag, vr, value));
    };

    put(
        &mut obj,
        Tag(0x0008, 0x0016),
        VR::UI,
        PrimitiveValue::from(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
    );
    put(
        &mut obj,
        Tag(0x0008, 0x0018),
        VR::UI,
        PrimitiveValue::from(sop_uid),
    );
    put(
        &mut obj,
        Tag(0x0020, 0x000D),
        VR::UI,
        PrimitiveValue::from(study_uid),
    );
    put(
        &mut obj,
        Tag(0x0020, 0x000E),
        VR::UI,
        PrimitiveValue::from(series_uid),
    );
    put(
        &mut obj,
        Tag(0x0010, 0x0010),
        VR::PN,
        PrimitiveValue::from("DOE^JANE"),
    );
    put(
        &mut obj,
        Tag(0x0010, 0x0020),
        VR::LO,
        PrimitiveValue::from("P1"),
    );
    put(
        &mut obj,
        Tag(0x0008, 0x1030),
        VR::LO,
        PrimitiveValue::from("CT CHEST"),
    );
    put(
        &mut obj,
        Tag(0x0008, 0x0020),
        VR::DA,
        PrimitiveValue::from("20260101"),
    );
    put(
        &mut obj,
        Tag(0x0008, 0x103E),
        VR::LO,
        PrimitiveValue::from("AXIAL"),
    );
    put(
        &mut obj,
        Tag(0x0008, 0x0060),
        VR::CS,
        PrimitiveValue::from("OT"),
    );
    put(
        &mut obj,
        Tag(0x0020, 0x0013),
        VR::IS,
        PrimitiveValue::from(instance_number.to_string()),
    );

    let file_obj = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
        )
        .expect("build file meta");
    file_obj.write_to_file(path).expect("write dicom fixture");
}
