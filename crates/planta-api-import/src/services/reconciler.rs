//! Create/update/skip reconciliation against stored employee state.
//!
//! The decision is a pure function over explicit inputs; the apply step
//! issues exactly one persistence call per row, insert or update, never
//! both.

use planta_db::models::{Employee, EmployeeUpdate, NewEmployee};

use crate::services::batch::RowOutcome;
use crate::services::row_normalizer::NormalizedEmployeeRow;
use crate::store::DirectoryStore;

/// The single persistence decision for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    Create(NewEmployee),
    Update(EmployeeUpdate),
    Skip,
}

/// Decide what to do with a normalized row.
///
/// No snapshot means the identifier is new: creation, which requires a name.
/// With a snapshot, every present field is compared against the stored value
/// and only differing fields enter the update payload; an empty payload is a
/// skip.
pub fn reconcile(
    row: &NormalizedEmployeeRow,
    existing: Option<&Employee>,
) -> Result<RowAction, String> {
    match existing {
        None => {
            if row.name.is_none() {
                return Err("name is required".to_string());
            }
            Ok(RowAction::Create(build_insert(row)))
        }
        Some(stored) => {
            let update = diff(row, stored);
            if update.is_empty() {
                Ok(RowAction::Skip)
            } else {
                Ok(RowAction::Update(update))
            }
        }
    }
}

/// Apply a reconciliation decision with exactly one persistence call.
/// Store failures become row-level outcomes; the batch keeps going.
pub async fn apply(store: &dyn DirectoryStore, id: i64, action: RowAction) -> RowOutcome {
    match action {
        RowAction::Create(new) => match store.insert_employee(new).await {
            Ok(()) => RowOutcome::Created,
            Err(e) => RowOutcome::Error(format!("failed to create employee {id}: {e}")),
        },
        RowAction::Update(update) => match store.update_employee(id, update).await {
            Ok(()) => RowOutcome::Updated,
            Err(e) => RowOutcome::Error(format!("failed to update employee {id}: {e}")),
        },
        RowAction::Skip => RowOutcome::Skipped,
    }
}

/// The full normalized record plus identifier, for the creation path.
fn build_insert(row: &NormalizedEmployeeRow) -> NewEmployee {
    NewEmployee {
        id: row.id,
        name: row.name.clone(),
        email: row.email.clone(),
        role: row.role.clone(),
        phone: row.phone.clone(),
        national_id: row.national_id.clone(),
        gender: row.gender.clone(),
        hire_date: row.hire_date,
        birth_date: row.birth_date,
        age: row.age,
        blood_type: row.blood_type.clone(),
        contract_type: row.contract_type.clone(),
        address: row.address.clone(),
        status: row.status.as_str().to_string(),
        termination_reason: row.termination_reason.clone(),
        termination_date: row.termination_date,
        company_id: row.company_id.flatten(),
        branch_id: row.branch_id.flatten(),
        position_id: row.position_id.flatten(),
        health_provider_id: row.health_provider_id.flatten(),
        pension_fund_id: row.pension_fund_id.flatten(),
        severance_fund_id: row.severance_fund_id.flatten(),
        compensation_fund_id: row.compensation_fund_id.flatten(),
    }
}

/// Case/whitespace-insensitive text equality. A stored NULL never equals a
/// present incoming value (the normalizer already filtered blanks out).
fn text_eq(incoming: &str, stored: Option<&str>) -> bool {
    match stored {
        Some(stored) => incoming.trim().to_lowercase() == stored.trim().to_lowercase(),
        None => false,
    }
}

/// Minimal update payload: only fields whose normalized value differs from
/// the stored value.
fn diff(row: &NormalizedEmployeeRow, stored: &Employee) -> EmployeeUpdate {
    let mut update = EmployeeUpdate::default();

    if let Some(v) = &row.name {
        if !text_eq(v, stored.name.as_deref()) {
            update.name = Some(v.clone());
        }
    }
    if let Some(v) = &row.email {
        if !text_eq(v, stored.email.as_deref()) {
            update.email = Some(v.clone());
        }
    }
    if let Some(v) = &row.role {
        if !text_eq(v, stored.role.as_deref()) {
            update.role = Some(v.clone());
        }
    }
    if let Some(v) = &row.phone {
        if !text_eq(v, stored.phone.as_deref()) {
            update.phone = Some(v.clone());
        }
    }
    if let Some(v) = &row.national_id {
        if !text_eq(v, stored.national_id.as_deref()) {
            update.national_id = Some(v.clone());
        }
    }
    if let Some(v) = &row.gender {
        if !text_eq(v, stored.gender.as_deref()) {
            update.gender = Some(v.clone());
        }
    }
    if let Some(v) = row.hire_date {
        if stored.hire_date != Some(v) {
            update.hire_date = Some(v);
        }
    }
    if let Some(v) = row.birth_date {
        if stored.birth_date != Some(v) {
            update.birth_date = Some(v);
        }
    }
    if let Some(v) = row.age {
        if stored.age != Some(v) {
            update.age = Some(v);
        }
    }
    if let Some(v) = &row.blood_type {
        if !text_eq(v, stored.blood_type.as_deref()) {
            update.blood_type = Some(v.clone());
        }
    }
    if let Some(v) = &row.contract_type {
        if !text_eq(v, stored.contract_type.as_deref()) {
            update.contract_type = Some(v.clone());
        }
    }
    if let Some(v) = &row.address {
        if !text_eq(v, stored.address.as_deref()) {
            update.address = Some(v.clone());
        }
    }

    // Status is always materialized by the normalizer (absent maps to
    // active), so it always participates in the comparison.
    let status = row.status.as_str();
    if !text_eq(status, stored.status.as_deref()) {
        update.status = Some(status.to_string());
    }

    if let Some(v) = &row.termination_reason {
        if !text_eq(v, stored.termination_reason.as_deref()) {
            update.termination_reason = Some(v.clone());
        }
    }
    if let Some(v) = row.termination_date {
        if stored.termination_date != Some(v) {
            update.termination_date = Some(v);
        }
    }

    if let Some(v) = row.company_id {
        if stored.company_id != v {
            update.company_id = Some(v);
        }
    }
    if let Some(v) = row.branch_id {
        if stored.branch_id != v {
            update.branch_id = Some(v);
        }
    }
    if let Some(v) = row.position_id {
        if stored.position_id != v {
            update.position_id = Some(v);
        }
    }
    if let Some(v) = row.health_provider_id {
        if stored.health_provider_id != v {
            update.health_provider_id = Some(v);
        }
    }
    if let Some(v) = row.pension_fund_id {
        if stored.pension_fund_id != v {
            update.pension_fund_id = Some(v);
        }
    }
    if let Some(v) = row.severance_fund_id {
        if stored.severance_fund_id != v {
            update.severance_fund_id = Some(v);
        }
    }
    if let Some(v) = row.compensation_fund_id {
        if stored.compensation_fund_id != v {
            update.compensation_fund_id = Some(v);
        }
    }

    update
}
