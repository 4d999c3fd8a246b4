//! Chunking of record sets into change batches

use axfr2route53_provider::{Change, ChangeBatch, ResourceRecordSet};

use crate::types::ResourceRecord;

/// Split `records` into consecutive chunks of at most `size`, order kept.
///
/// A `size` of zero is treated as one.
pub fn chunk_records(records: &[ResourceRecord], size: usize) -> Vec<&[ResourceRecord]> {
    records.chunks(size.max(1)).collect()
}

/// One UPSERT change per record set.
pub fn build_change_batch(records: &[ResourceRecord], comment: Option<&str>) -> ChangeBatch {
    let changes = records
        .iter()
        .map(|record| Change::upsert(ResourceRecordSet::from(record)))
        .collect();
    ChangeBatch::new(comment.map(str::to_string), changes)
}
