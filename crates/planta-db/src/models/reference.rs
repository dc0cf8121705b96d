//! Foreign-entity reference tables.
//!
//! Import rows carry relation values as display names; these tables are the
//! name → id lookup sources.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::DbError;

/// The reference tables an employee row can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Company,
    Branch,
    Position,
    HealthProvider,
    PensionFund,
    SeveranceFund,
    CompensationFund,
}

impl ReferenceKind {
    /// All reference kinds, in the order they are loaded.
    pub const ALL: [ReferenceKind; 7] = [
        ReferenceKind::Company,
        ReferenceKind::Branch,
        ReferenceKind::Position,
        ReferenceKind::HealthProvider,
        ReferenceKind::PensionFund,
        ReferenceKind::SeveranceFund,
        ReferenceKind::CompensationFund,
    ];

    /// Table backing this reference kind.
    #[must_use]
    pub fn table(&self) -> &'static str {
        match self {
            ReferenceKind::Company => "companies",
            ReferenceKind::Branch => "branches",
            ReferenceKind::Position => "positions",
            ReferenceKind::HealthProvider => "health_providers",
            ReferenceKind::PensionFund => "pension_funds",
            ReferenceKind::SeveranceFund => "severance_funds",
            ReferenceKind::CompensationFund => "compensation_funds",
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Company => "company",
            ReferenceKind::Branch => "branch",
            ReferenceKind::Position => "position",
            ReferenceKind::HealthProvider => "health_provider",
            ReferenceKind::PensionFund => "pension_fund",
            ReferenceKind::SeveranceFund => "severance_fund",
            ReferenceKind::CompensationFund => "compensation_fund",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reference row: numeric id plus display name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: i64,
    pub name: String,
}

impl ReferenceEntry {
    /// List all rows of one reference table.
    ///
    /// Rows come back in ascending id order so downstream indexing has a
    /// deterministic first-occurrence tie-break.
    pub async fn list(pool: &PgPool, kind: ReferenceKind) -> Result<Vec<Self>, DbError> {
        let sql = format!("SELECT id, name FROM {} ORDER BY id", kind.table());
        sqlx::query_as(&sql)
            .fetch_all(pool)
            .await
            .map_err(DbError::QueryFailed)
    }
}
