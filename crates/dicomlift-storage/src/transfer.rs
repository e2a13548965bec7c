use dicomlift_core::constants::{MULTIPART_THRESHOLD, PART_SIZE};

/// How a payload of a given size is sent to the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    SingleShot,
    Multipart,
}

impl TransferStrategy {
    /// Payloads at or below the threshold go up in one `PutObject`.
    pub fn for_size(len: u64) -> Self {
        if len <= MULTIPART_THRESHOLD {
            TransferStrategy::SingleShot
        } else {
            TransferStrategy::Multipart
        }
    }
}

/// Byte range of one multipart part. Part numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpan {
    pub part_number: i32,
    pub offset: u64,
    pub len: u64,
}

/// Splits a payload into part-sized spans covering it exactly. Only the last
/// span may be shorter than the part size.
pub fn part_spans(total: u64) -> Vec<PartSpan> {
    let mut spans = Vec::new();
    let mut offset = 0u64;
    let mut part_number = 1i32;
    while offset < total {
        let len = PART_SIZE.min(total - offset);
        spans.push(PartSpan {
            part_number,
            offset,
            len,
        });
        offset += len;
        part_number += 1;
    }
    spans
}
