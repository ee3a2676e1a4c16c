//! Batch-level steps that run after every file has been parsed:
//! ordering, duplicate marking, per-file grouping and the summary counts.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{FileTransaction, ParsedTransaction};

/// Stable sort by date descending, then type (credit first), then title.
pub fn sort_transactions(records: &mut [FileTransaction]) {
    records.sort_by(|a, b| {
        let (a, b) = (&a.transaction, &b.transaction);
        b.date
            .cmp(&a.date)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Flag every record whose key is already persisted for the user.
///
/// Records within the same batch are never marked against each other.
pub fn mark_duplicates(
    records: Vec<FileTransaction>,
    persisted: &HashSet<String>,
) -> Vec<ParsedTransaction> {
    records
        .into_iter()
        .map(|r| ParsedTransaction {
            is_duplicate: persisted.contains(&r.transaction.key),
            file_id: r.file_id,
            transaction: r.transaction,
        })
        .collect()
}

/// Partition records by file id, keeping their relative order.
///
/// Every id in `file_ids` is present in the result, even with no rows.
pub fn group_by_file<I, S>(
    file_ids: I,
    records: Vec<ParsedTransaction>,
) -> BTreeMap<String, Vec<ParsedTransaction>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut grouped: BTreeMap<String, Vec<ParsedTransaction>> = file_ids
        .into_iter()
        .map(|id| (id.into(), Vec::new()))
        .collect();
    for record in records {
        grouped
            .entry(record.file_id.clone())
            .or_default()
            .push(record);
    }
    grouped
}

/// Counts reported alongside a batch result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_count: usize,
    pub new_count: usize,
    pub duplicate_count: usize,
}

impl BatchSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ParsedTransaction>,
    {
        records
            .into_iter()
            .fold(BatchSummary::default(), |mut summary, record| {
                summary.total_count += 1;
                if record.is_duplicate {
                    summary.duplicate_count += 1;
                } else {
                    summary.new_count += 1;
                }
                summary
            })
    }
}
