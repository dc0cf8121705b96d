//! API request/response models for the bulk employee import endpoints.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::batch::{BatchSummary, RowFailure};

// ---------------------------------------------------------------------------
// Raw spreadsheet cells
// ---------------------------------------------------------------------------

/// One spreadsheet cell as delivered by the parsing UI.
///
/// Untagged on the wire: JSON numbers stay numbers (day-serials included),
/// ISO date strings become `Date`, anything else is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

/// A raw import row: spreadsheet column label → cell value.
pub type ImportRow = HashMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Import request/response
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/employees/import`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    /// Parsed spreadsheet rows, in file order.
    pub rows: Vec<ImportRow>,

    /// Global 0-based position of `rows[0]` in the source file, so error row
    /// numbers line up with the operator's sheet.
    #[serde(default)]
    pub start_offset: usize,

    /// Override for the orchestrator batch size.
    pub batch_size: Option<usize>,
}

/// Merged outcome of a whole import operation.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReportResponse {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<RowFailureResponse>,
}

/// One failed row in the report.
#[derive(Debug, Clone, Serialize)]
pub struct RowFailureResponse {
    /// 1-based global row number.
    pub row: usize,
    pub error: String,
    /// The row's original cells, for operator review.
    pub raw_data: ImportRow,
}

impl From<RowFailure> for RowFailureResponse {
    fn from(failure: RowFailure) -> Self {
        Self {
            row: failure.row,
            error: failure.error,
            raw_data: failure.raw_data,
        }
    }
}

impl From<BatchSummary> for ImportReportResponse {
    fn from(summary: BatchSummary) -> Self {
        Self {
            processed: summary.processed,
            created: summary.created,
            updated: summary.updated,
            skipped: summary.skipped,
            errors: summary.errors.into_iter().map(Into::into).collect(),
        }
    }
}
