//! Bulk employee import/export for the planta HR portal.
//!
//! Given spreadsheet-derived rows, the engine resolves foreign-entity names
//! to ids, decides create/update/skip per row against stored state, persists
//! minimal diffs, and isolates row failures so one bad row never aborts a
//! batch. The directory CSV export lives here too, reusing the same column
//! vocabulary and reference catalog.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use planta_api_import::{import_router, ImportState, PgDirectoryStore};
//!
//! let store = Arc::new(PgDirectoryStore::new(pool));
//! let app = axum::Router::new().merge(import_router(ImportState::new(store)));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

// Re-export public API
pub use error::ImportError;
pub use router::{import_router, ImportState};
pub use services::batch::{BatchSummary, RowFailure, RowOutcome};
pub use services::orchestrator::{ImportConfig, ImportProgress, ImportRunner};
pub use store::{DirectoryStore, PgDirectoryStore, StoreError};
