//! Database models and SQL access for the planta HR directory.
//!
//! Each model struct owns its SQL through associated async fns over a
//! [`sqlx::PgPool`]. Queries are runtime-checked so the crate builds without
//! a live database.

pub mod error;
pub mod models;

pub use error::DbError;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Default connection pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connect to the HR directory database.
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(DbError::ConnectionFailed)
}
