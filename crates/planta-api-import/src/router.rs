//! Router and shared state for the import/export endpoints.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::handlers;
use crate::services::orchestrator::ImportConfig;
use crate::store::DirectoryStore;

/// Shared state for import routes.
#[derive(Clone)]
pub struct ImportState {
    /// HR directory the engine reconciles against.
    pub store: Arc<dyn DirectoryStore>,
    /// Default orchestrator configuration; a request may override the batch
    /// size.
    pub config: ImportConfig,
}

impl ImportState {
    /// Create state with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            store,
            config: ImportConfig::default(),
        }
    }

    /// Create state with a custom configuration.
    #[must_use]
    pub fn with_config(store: Arc<dyn DirectoryStore>, config: ImportConfig) -> Self {
        Self { store, config }
    }
}

/// Create the import/export router.
///
/// - POST /admin/employees/import — run a bulk import, return the report
/// - GET  /admin/employees/export — download the directory as CSV
///
/// The embedding application layers its auth middleware on top.
pub fn import_router(state: ImportState) -> Router {
    Router::new()
        .route(
            "/admin/employees/import",
            post(handlers::import::run_import),
        )
        .route(
            "/admin/employees/export",
            get(handlers::import::export_employees),
        )
        .layer(Extension(state))
}
