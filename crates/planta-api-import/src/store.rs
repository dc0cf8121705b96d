//! Storage seam for the import/export engine.
//!
//! The engine talks to the HR directory through the [`DirectoryStore`]
//! capability trait, so batches are testable against an in-memory
//! implementation. [`PgDirectoryStore`] is the production implementation,
//! delegating to the planta-db model fns.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use planta_db::models::{Employee, EmployeeUpdate, NewEmployee, ReferenceEntry, ReferenceKind};
use planta_db::DbError;

/// Channel the portal's cached directory views listen on.
const REFRESH_CHANNEL: &str = "planta_directory";

/// Errors surfaced by a `DirectoryStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database-backed store failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Failure from a non-SQL backend.
    #[error("{0}")]
    Backend(String),
}

/// Read/write operations the import engine needs from the HR directory.
///
/// Per batch: one bulk read per reference table and one bulk read over
/// employees. Per processed row: exactly one single-row write, insert or
/// partial update, never both.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Bulk-read one reference table as `{id, name}` pairs.
    async fn list_reference(&self, kind: ReferenceKind)
        -> Result<Vec<ReferenceEntry>, StoreError>;

    /// Bulk-read employees whose id is in `ids`.
    async fn find_employees_by_ids(&self, ids: &[i64]) -> Result<Vec<Employee>, StoreError>;

    /// Insert one new employee.
    async fn insert_employee(&self, employee: NewEmployee) -> Result<(), StoreError>;

    /// Partially update one employee by id; only columns set in `update`
    /// change.
    async fn update_employee(&self, id: i64, update: EmployeeUpdate) -> Result<(), StoreError>;

    /// Read the whole directory, for export.
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError>;

    /// One-time end-of-operation cache refresh signal.
    async fn refresh_directory(&self) -> Result<(), StoreError>;
}

/// Postgres-backed `DirectoryStore`.
#[derive(Clone)]
pub struct PgDirectoryStore {
    pool: PgPool,
}

impl PgDirectoryStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn list_reference(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceEntry>, StoreError> {
        Ok(ReferenceEntry::list(&self.pool, kind).await?)
    }

    async fn find_employees_by_ids(&self, ids: &[i64]) -> Result<Vec<Employee>, StoreError> {
        Ok(Employee::find_by_ids(&self.pool, ids).await?)
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<(), StoreError> {
        Ok(Employee::insert(&self.pool, &employee).await?)
    }

    async fn update_employee(&self, id: i64, update: EmployeeUpdate) -> Result<(), StoreError> {
        Ok(Employee::apply_update(&self.pool, id, &update).await?)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(Employee::list_all(&self.pool).await?)
    }

    async fn refresh_directory(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT pg_notify($1, 'refresh')")
            .bind(REFRESH_CHANNEL)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Db(DbError::QueryFailed(e)))?;
        Ok(())
    }
}
