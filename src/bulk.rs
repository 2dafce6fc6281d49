//! Bulk chunking: split oversized requests into gateway-compliant batches and
//! merge the per-batch results into one logical report.

use std::ops::Range;

use crate::client::SmsGateError;
use crate::domain::MessageReceipt;
use crate::normalize::NormalizedResult;

/// Partition `total` items into contiguous, non-overlapping ranges of at most
/// `chunk_size`, preserving order.
///
/// `chunk_size` is validated at configuration time and is never zero here.
pub(crate) fn batch_ranges(total: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(total.div_ceil(chunk_size.max(1)));
    let mut start = 0;
    while start < total {
        let end = usize::min(start + chunk_size, total);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Terminal state of a logical call.
pub enum Outcome {
    /// Every batch succeeded.
    Succeeded,
    /// Some batches succeeded, some exhausted their retries (chunked calls
    /// only).
    PartiallyFailed,
    /// Every batch failed.
    Failed,
}

#[derive(Debug)]
/// Merged result of a logical bulk call.
///
/// Partial failure is reported here rather than raised: completed batches
/// keep their results and failed batches are listed with their errors.
pub struct BulkReport {
    pub outcome: Outcome,
    /// Items across all batches.
    pub total_items: usize,
    /// Items the gateway accepted, summed across succeeded batches.
    pub success_count: usize,
    /// Per-message receipts concatenated in submission order.
    pub receipts: Vec<MessageReceipt>,
    /// Per-batch normalized results, in batch order.
    pub batches: Vec<BatchResult>,
    /// Batches that failed after exhausting retries.
    pub failures: Vec<BatchFailure>,
}

impl BulkReport {
    /// Whether every batch succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }
}

#[derive(Debug)]
/// Results of one succeeded batch.
pub struct BatchResult {
    pub batch_index: usize,
    /// Item range this batch covered within the logical request.
    pub item_range: Range<usize>,
    /// Normalized results for this batch, one per response envelope.
    pub results: Vec<NormalizedResult>,
}

#[derive(Debug)]
/// A batch that failed after exhausting retries.
pub struct BatchFailure {
    pub batch_index: usize,
    pub item_range: Range<usize>,
    /// The last attempt's error, unchanged.
    pub error: SmsGateError,
}

/// What one succeeded batch contributes to the merged report.
#[derive(Debug)]
pub(crate) struct BatchSuccess {
    pub results: Vec<NormalizedResult>,
    pub receipts: Vec<MessageReceipt>,
    pub success_count: usize,
}

/// Merge per-batch outcomes into one report.
///
/// The merge is a join over every batch outcome; a failed batch never
/// discards a completed sibling's results.
pub(crate) fn merge(
    ranges: &[Range<usize>],
    outcomes: Vec<Result<BatchSuccess, SmsGateError>>,
) -> BulkReport {
    let total_items = ranges.last().map_or(0, |range| range.end);
    let mut receipts = Vec::new();
    let mut batches = Vec::new();
    let mut failures = Vec::new();
    let mut success_count = 0;

    for (batch_index, (range, outcome)) in ranges.iter().zip(outcomes).enumerate() {
        match outcome {
            Ok(batch) => {
                success_count += batch.success_count;
                receipts.extend(batch.receipts);
                batches.push(BatchResult {
                    batch_index,
                    item_range: range.clone(),
                    results: batch.results,
                });
            }
            Err(error) => {
                failures.push(BatchFailure {
                    batch_index,
                    item_range: range.clone(),
                    error,
                });
            }
        }
    }

    let outcome = if failures.is_empty() {
        Outcome::Succeeded
    } else if batches.is_empty() {
        Outcome::Failed
    } else {
        Outcome::PartiallyFailed
    };

    BulkReport {
        outcome,
        total_items,
        success_count,
        receipts,
        batches,
        failures,
    }
}
