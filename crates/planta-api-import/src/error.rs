//! Error types for the bulk employee import API.
//!
//! Uses RFC 7807 Problem Details for HTTP APIs. Only batch-fatal failures
//! surface here; row-level failures travel inside the batch summary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Base URL for error type URIs.
const ERROR_BASE_URL: &str = "https://planta.app/errors/import";

/// RFC 7807 Problem Details structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable summary.
    pub title: String,

    /// HTTP status code.
    pub status: u16,

    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI of the specific occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new `ProblemDetails` instance.
    #[must_use]
    pub fn new(error_type: &str, title: &str, status: StatusCode) -> Self {
        Self {
            error_type: format!("{ERROR_BASE_URL}/{error_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Import API errors. All of these abort the operation; none of them
/// describes a single bad row.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The request contained no rows.
    #[error("Import contains no rows")]
    EmptyImport,

    /// A reference-table bulk read failed before any row was processed.
    #[error("Reference data load failed: {0}")]
    ReferenceLoad(#[source] StoreError),

    /// The existing-employee bulk read failed before any row was processed.
    #[error("Employee snapshot load failed: {0}")]
    SnapshotLoad(#[source] StoreError),

    /// Export read or CSV encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Storage error outside the batch pipeline.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Convert to `ProblemDetails`.
    pub fn to_problem_details(&self) -> ProblemDetails {
        match self {
            ImportError::EmptyImport => {
                ProblemDetails::new("empty-import", "Empty Import", StatusCode::BAD_REQUEST)
                    .with_detail("The import request contained no rows.")
            }

            ImportError::ReferenceLoad(err) => {
                tracing::error!(error = %err, "Reference data load failed");
                ProblemDetails::new(
                    "reference-load-failed",
                    "Reference Data Load Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("A reference table could not be read. No rows were processed.")
            }

            ImportError::SnapshotLoad(err) => {
                tracing::error!(error = %err, "Employee snapshot load failed");
                ProblemDetails::new(
                    "snapshot-load-failed",
                    "Employee Snapshot Load Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("Existing employees could not be read. No rows were processed.")
            }

            ImportError::Export(msg) => {
                tracing::error!(error = %msg, "Directory export failed");
                ProblemDetails::new(
                    "export-failed",
                    "Export Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("The directory could not be exported. Please try again later.")
            }

            ImportError::Store(err) => {
                tracing::error!(error = %err, "Storage error in import");
                ProblemDetails::new(
                    "storage-error",
                    "Storage Error",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("A storage error occurred. Please try again later.")
            }
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportError::EmptyImport => StatusCode::BAD_REQUEST,
            ImportError::ReferenceLoad(_)
            | ImportError::SnapshotLoad(_)
            | ImportError::Export(_)
            | ImportError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let problem = self.to_problem_details();

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_import_maps_to_bad_request() {
        let err = ImportError::EmptyImport;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let problem = err.to_problem_details();
        assert!(problem.error_type.ends_with("empty-import"));
        assert_eq!(problem.status, 400);
    }

    #[test]
    fn test_reference_load_is_operation_level() {
        let err = ImportError::ReferenceLoad(StoreError::Backend("down".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Reference data load failed: down");
    }
}
