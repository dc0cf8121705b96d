//! Import orchestration: batch slicing, progress, and the final refresh.

use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::models::{CellValue, ImportRow};
use crate::services::batch::{self, BatchSummary};
use crate::store::DirectoryStore;

/// Orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Rows per batch call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    100
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

/// Progress snapshot reported after each completed batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImportProgress {
    pub completed_batches: usize,
    pub total_batches: usize,
    pub processed_rows: usize,
    pub total_rows: usize,
}

impl ImportProgress {
    /// Fraction of batches completed, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total_batches == 0 {
            1.0
        } else {
            self.completed_batches as f64 / self.total_batches as f64
        }
    }
}

/// Drives a whole import operation over a `DirectoryStore`.
pub struct ImportRunner<'a> {
    store: &'a dyn DirectoryStore,
    config: ImportConfig,
}

impl<'a> ImportRunner<'a> {
    #[must_use]
    pub fn new(store: &'a dyn DirectoryStore) -> Self {
        Self {
            store,
            config: ImportConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(store: &'a dyn DirectoryStore, mut config: ImportConfig) -> Self {
        config.batch_size = config.batch_size.max(1);
        Self { store, config }
    }

    /// Run the import over `rows`, reporting progress after each batch.
    ///
    /// `start_offset` is the global 0-based position of `rows[0]` in the
    /// source file, so row numbers in errors match the operator's sheet.
    /// Batches run sequentially, each rebuilding the reference catalog and
    /// employee snapshot: the reads are redundant, but every batch stays
    /// independently retryable and the per-call payload stays bounded.
    pub async fn run<F>(
        &self,
        rows: &[ImportRow],
        start_offset: usize,
        mut on_progress: F,
    ) -> Result<BatchSummary, ImportError>
    where
        F: FnMut(ImportProgress),
    {
        if rows.is_empty() {
            return Err(ImportError::EmptyImport);
        }

        let batch_size = self.config.batch_size;
        let total_batches = rows.len().div_ceil(batch_size);
        let mut report = BatchSummary::default();

        for (batch_index, chunk) in rows.chunks(batch_size).enumerate() {
            let offset = start_offset + batch_index * batch_size;
            let transport_rows = to_transport_rows(chunk);
            let summary = batch::process_batch(self.store, &transport_rows, offset).await?;

            tracing::info!(
                batch = batch_index + 1,
                total_batches,
                created = summary.created,
                updated = summary.updated,
                skipped = summary.skipped,
                errors = summary.errors.len(),
                "Import batch completed"
            );

            report.merge(summary);
            on_progress(ImportProgress {
                completed_batches: batch_index + 1,
                total_batches,
                processed_rows: report.processed,
                total_rows: rows.len(),
            });
        }

        // Cached directory views refresh once per operation, not per batch.
        if let Err(e) = self.store.refresh_directory().await {
            tracing::warn!(error = %e, "Directory refresh signal failed");
        }

        tracing::info!(
            processed = report.processed,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            errors = report.errors.len(),
            "Import completed"
        );

        Ok(report)
    }
}

/// Convert cells to the transport-safe form the batch pipeline expects:
/// date cells become `%Y-%m-%d` text.
fn to_transport_rows(rows: &[ImportRow]) -> Vec<ImportRow> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(label, value)| {
                    let value = match value {
                        CellValue::Date(d) => CellValue::Text(d.format("%Y-%m-%d").to_string()),
                        other => other.clone(),
                    };
                    (label.clone(), value)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_config_default_batch_size() {
        let config: ImportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.batch_size, 100);
        assert_eq!(ImportConfig::default().batch_size, 100);
    }

    #[test]
    fn test_progress_fraction() {
        let progress = ImportProgress {
            completed_batches: 1,
            total_batches: 4,
            processed_rows: 25,
            total_rows: 100,
        };
        assert!((progress.fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transport_rows_stringify_dates() {
        let rows = vec![[(
            "Fecha Ingreso".to_string(),
            CellValue::Date(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
        )]
        .into_iter()
        .collect()];

        let transport = to_transport_rows(&rows);
        assert_eq!(
            transport[0].get("Fecha Ingreso"),
            Some(&CellValue::Text("2021-01-01".to_string()))
        );
    }
}
