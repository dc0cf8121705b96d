//! Import and export handlers.
//!
//! - POST /admin/employees/import — run a bulk import, return the report
//! - GET  /admin/employees/export — download the directory as CSV

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use crate::error::ImportError;
use crate::models::{ImportReportResponse, ImportRequest};
use crate::router::ImportState;
use crate::services::export::export_directory;
use crate::services::orchestrator::{ImportConfig, ImportRunner};

/// POST /admin/employees/import
///
/// Runs the whole import synchronously and returns the merged report.
/// Batch-fatal failures surface as problem+json; row failures ride inside
/// the report's error list and never abort the operation.
pub async fn run_import(
    Extension(state): Extension<ImportState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportReportResponse>, ImportError> {
    let config = ImportConfig {
        batch_size: request.batch_size.unwrap_or(state.config.batch_size),
    };
    let runner = ImportRunner::with_config(state.store.as_ref(), config);

    let report = runner
        .run(&request.rows, request.start_offset, |progress| {
            tracing::info!(
                completed_batches = progress.completed_batches,
                total_batches = progress.total_batches,
                fraction = progress.fraction(),
                "Import progress"
            );
        })
        .await?;

    Ok(Json(report.into()))
}

/// GET /admin/employees/export
pub async fn export_employees(
    Extension(state): Extension<ImportState>,
) -> Result<Response, ImportError> {
    let csv = export_directory(state.store.as_ref()).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"empleados.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
