//! Per-batch pipeline and outcome aggregation.
//!
//! Reference and snapshot reads are batch-fatal and happen before any row is
//! touched; everything after them is row-isolated.

use std::collections::HashMap;

use serde::Serialize;

use planta_db::models::Employee;

use crate::error::ImportError;
use crate::models::ImportRow;
use crate::services::reconciler;
use crate::services::reference_resolver::ReferenceCatalog;
use crate::services::row_normalizer;
use crate::store::DirectoryStore;

/// Terminal classification of one input row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Created,
    Updated,
    Skipped,
    Error(String),
}

/// One failed row, kept with its raw cells for operator review.
#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    /// 1-based global row number.
    pub row: usize,
    pub error: String,
    pub raw_data: ImportRow,
}

/// Running totals for a batch and, merged, for the whole operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<RowFailure>,
}

impl BatchSummary {
    /// Fold one row outcome into the totals. `processed` increments exactly
    /// once per row regardless of outcome.
    pub fn record(&mut self, row_number: usize, raw: &ImportRow, outcome: RowOutcome) {
        self.processed += 1;
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Updated => self.updated += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Error(error) => self.errors.push(RowFailure {
                row: row_number,
                error,
                raw_data: raw.clone(),
            }),
        }
    }

    /// Fold another batch into this running total.
    pub fn merge(&mut self, other: BatchSummary) {
        self.processed += other.processed;
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }

    /// `processed == created + updated + skipped + errors.len()`, always.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.processed == self.created + self.updated + self.skipped + self.errors.len()
    }
}

/// Process one batch of raw rows.
///
/// `start_offset` is the global 0-based position of `rows[0]`; reported row
/// numbers are 1-based and stay consistent across batches.
pub async fn process_batch(
    store: &dyn DirectoryStore,
    rows: &[ImportRow],
    start_offset: usize,
) -> Result<BatchSummary, ImportError> {
    let ids = candidate_ids(rows);

    // Reference tables and the employee snapshot are independent reads;
    // issue them together and require both before touching any row.
    let (catalog, existing) = tokio::try_join!(
        async {
            ReferenceCatalog::load(store)
                .await
                .map_err(ImportError::ReferenceLoad)
        },
        async {
            store
                .find_employees_by_ids(&ids)
                .await
                .map_err(ImportError::SnapshotLoad)
        },
    )?;

    let snapshot: HashMap<i64, Employee> =
        existing.into_iter().map(|e| (e.id, e)).collect();

    let mut summary = BatchSummary::default();
    for (index, raw) in rows.iter().enumerate() {
        let row_number = start_offset + index + 1;
        let outcome = process_row(store, &catalog, &snapshot, raw).await;
        summary.record(row_number, raw, outcome);
    }
    Ok(summary)
}

/// Normalize, reconcile, and persist one row. Never fails the batch.
async fn process_row(
    store: &dyn DirectoryStore,
    catalog: &ReferenceCatalog,
    snapshot: &HashMap<i64, Employee>,
    raw: &ImportRow,
) -> RowOutcome {
    let normalized = match row_normalizer::normalize_row(raw, catalog) {
        Ok(normalized) => normalized,
        Err(message) => return RowOutcome::Error(message),
    };

    let action = match reconciler::reconcile(&normalized, snapshot.get(&normalized.id)) {
        Ok(action) => action,
        Err(message) => return RowOutcome::Error(message),
    };

    reconciler::apply(store, normalized.id, action).await
}

/// Identifiers that parse from the raw rows, deduplicated, for the bulk
/// snapshot read. Rows whose id does not parse are left to error during
/// normalization.
fn candidate_ids(rows: &[ImportRow]) -> Vec<i64> {
    let mut ids: Vec<i64> = rows.iter().filter_map(row_normalizer::extract_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
