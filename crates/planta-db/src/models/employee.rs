//! Employee directory model.
//!
//! The `employees` table is owned by the portal backend; this crate only
//! reads it in bulk and writes single rows (insert or partial update).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::DbError;

/// A stored employee record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Employee {
    /// Employee identifier, assigned by the source spreadsheet.
    pub id: i64,

    /// Full display name.
    pub name: Option<String>,

    /// Contact email.
    pub email: Option<String>,

    /// Portal role name.
    pub role: Option<String>,

    /// Contact phone.
    pub phone: Option<String>,

    /// National identity document number.
    pub national_id: Option<String>,

    /// Free-form gender.
    pub gender: Option<String>,

    /// Hire date.
    pub hire_date: Option<NaiveDate>,

    /// Birth date.
    pub birth_date: Option<NaiveDate>,

    /// Age in years.
    pub age: Option<i32>,

    /// Blood type label.
    pub blood_type: Option<String>,

    /// Contract type label.
    pub contract_type: Option<String>,

    /// Home address.
    pub address: Option<String>,

    /// Employment status: "activo" or "inactivo".
    pub status: Option<String>,

    /// Termination reason, when terminated.
    pub termination_reason: Option<String>,

    /// Termination date, when terminated.
    pub termination_date: Option<NaiveDate>,

    /// Company relation.
    pub company_id: Option<i64>,

    /// Branch relation.
    pub branch_id: Option<i64>,

    /// Position relation.
    pub position_id: Option<i64>,

    /// Health provider relation.
    pub health_provider_id: Option<i64>,

    /// Pension fund relation.
    pub pension_fund_id: Option<i64>,

    /// Severance fund relation.
    pub severance_fund_id: Option<i64>,

    /// Compensation fund relation.
    pub compensation_fund_id: Option<i64>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a new employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewEmployee {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub gender: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
    pub blood_type: Option<String>,
    pub contract_type: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub termination_reason: Option<String>,
    pub termination_date: Option<NaiveDate>,
    pub company_id: Option<i64>,
    pub branch_id: Option<i64>,
    pub position_id: Option<i64>,
    pub health_provider_id: Option<i64>,
    pub pension_fund_id: Option<i64>,
    pub severance_fund_id: Option<i64>,
    pub compensation_fund_id: Option<i64>,
}

/// A sparse partial update for one employee.
///
/// `None` leaves the column untouched. Relation fields are doubly optional:
/// `Some(None)` writes an explicit NULL (no relation).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub gender: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
    pub blood_type: Option<String>,
    pub contract_type: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub termination_reason: Option<String>,
    pub termination_date: Option<NaiveDate>,
    pub company_id: Option<Option<i64>>,
    pub branch_id: Option<Option<i64>>,
    pub position_id: Option<Option<i64>>,
    pub health_provider_id: Option<Option<i64>>,
    pub pension_fund_id: Option<Option<i64>>,
    pub severance_fund_id: Option<Option<i64>>,
    pub compensation_fund_id: Option<Option<i64>>,
}

impl EmployeeUpdate {
    /// True when no column is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the columns this update touches, in table order.
    #[must_use]
    pub fn changed_columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.name.is_some() {
            columns.push("name");
        }
        if self.email.is_some() {
            columns.push("email");
        }
        if self.role.is_some() {
            columns.push("role");
        }
        if self.phone.is_some() {
            columns.push("phone");
        }
        if self.national_id.is_some() {
            columns.push("national_id");
        }
        if self.gender.is_some() {
            columns.push("gender");
        }
        if self.hire_date.is_some() {
            columns.push("hire_date");
        }
        if self.birth_date.is_some() {
            columns.push("birth_date");
        }
        if self.age.is_some() {
            columns.push("age");
        }
        if self.blood_type.is_some() {
            columns.push("blood_type");
        }
        if self.contract_type.is_some() {
            columns.push("contract_type");
        }
        if self.address.is_some() {
            columns.push("address");
        }
        if self.status.is_some() {
            columns.push("status");
        }
        if self.termination_reason.is_some() {
            columns.push("termination_reason");
        }
        if self.termination_date.is_some() {
            columns.push("termination_date");
        }
        if self.company_id.is_some() {
            columns.push("company_id");
        }
        if self.branch_id.is_some() {
            columns.push("branch_id");
        }
        if self.position_id.is_some() {
            columns.push("position_id");
        }
        if self.health_provider_id.is_some() {
            columns.push("health_provider_id");
        }
        if self.pension_fund_id.is_some() {
            columns.push("pension_fund_id");
        }
        if self.severance_fund_id.is_some() {
            columns.push("severance_fund_id");
        }
        if self.compensation_fund_id.is_some() {
            columns.push("compensation_fund_id");
        }
        columns
    }
}

impl Employee {
    /// Bulk-read employees whose id is in `ids`.
    pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>, DbError> {
        sqlx::query_as(
            r"
            SELECT * FROM employees
            WHERE id = ANY($1)
            ",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(DbError::QueryFailed)
    }

    /// Read the whole directory in id order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, DbError> {
        sqlx::query_as(
            r"
            SELECT * FROM employees
            ORDER BY id
            ",
        )
        .fetch_all(pool)
        .await
        .map_err(DbError::QueryFailed)
    }

    /// Insert one new employee.
    pub async fn insert(pool: &PgPool, new: &NewEmployee) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO employees
                (id, name, email, role, phone, national_id, gender,
                 hire_date, birth_date, age, blood_type, contract_type,
                 address, status, termination_reason, termination_date,
                 company_id, branch_id, position_id, health_provider_id,
                 pension_fund_id, severance_fund_id, compensation_fund_id)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                 $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            ",
        )
        .bind(new.id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.role)
        .bind(&new.phone)
        .bind(&new.national_id)
        .bind(&new.gender)
        .bind(new.hire_date)
        .bind(new.birth_date)
        .bind(new.age)
        .bind(&new.blood_type)
        .bind(&new.contract_type)
        .bind(&new.address)
        .bind(&new.status)
        .bind(&new.termination_reason)
        .bind(new.termination_date)
        .bind(new.company_id)
        .bind(new.branch_id)
        .bind(new.position_id)
        .bind(new.health_provider_id)
        .bind(new.pension_fund_id)
        .bind(new.severance_fund_id)
        .bind(new.compensation_fund_id)
        .execute(pool)
        .await
        .map_err(DbError::QueryFailed)?;
        Ok(())
    }

    /// Partially update one employee by id; only columns set in `update`
    /// are written.
    pub async fn apply_update(
        pool: &PgPool,
        id: i64,
        update: &EmployeeUpdate,
    ) -> Result<(), DbError> {
        if update.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE employees SET ");
        {
            let mut sets = builder.separated(", ");
            if let Some(v) = &update.name {
                sets.push("name = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.email {
                sets.push("email = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.role {
                sets.push("role = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.phone {
                sets.push("phone = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.national_id {
                sets.push("national_id = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.gender {
                sets.push("gender = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = update.hire_date {
                sets.push("hire_date = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.birth_date {
                sets.push("birth_date = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.age {
                sets.push("age = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = &update.blood_type {
                sets.push("blood_type = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.contract_type {
                sets.push("contract_type = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.address {
                sets.push("address = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.status {
                sets.push("status = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = &update.termination_reason {
                sets.push("termination_reason = ");
                sets.push_bind_unseparated(v.clone());
            }
            if let Some(v) = update.termination_date {
                sets.push("termination_date = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.company_id {
                sets.push("company_id = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.branch_id {
                sets.push("branch_id = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.position_id {
                sets.push("position_id = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.health_provider_id {
                sets.push("health_provider_id = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.pension_fund_id {
                sets.push("pension_fund_id = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.severance_fund_id {
                sets.push("severance_fund_id = ");
                sets.push_bind_unseparated(v);
            }
            if let Some(v) = update.compensation_fund_id {
                sets.push("compensation_fund_id = ");
                sets.push_bind_unseparated(v);
            }
            sets.push("updated_at = NOW()");
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder
            .build()
            .execute(pool)
            .await
            .map_err(DbError::QueryFailed)?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("employee {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update() {
        let update = EmployeeUpdate::default();
        assert!(update.is_empty());
        assert!(update.changed_columns().is_empty());
    }

    #[test]
    fn test_changed_columns_tracks_set_fields() {
        let update = EmployeeUpdate {
            phone: Some("3001234567".to_string()),
            company_id: Some(None),
            ..EmployeeUpdate::default()
        };
        assert!(!update.is_empty());
        assert_eq!(update.changed_columns(), vec!["phone", "company_id"]);
    }

    #[test]
    fn test_explicit_null_relation_is_a_change() {
        let update = EmployeeUpdate {
            branch_id: Some(None),
            ..EmployeeUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
