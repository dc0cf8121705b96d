//! Shared test fixtures: an in-memory `DirectoryStore` and row builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use planta_api_import::models::{CellValue, ImportRow};
use planta_api_import::store::{DirectoryStore, StoreError};
use planta_db::models::{Employee, EmployeeUpdate, NewEmployee, ReferenceEntry, ReferenceKind};

/// In-memory `DirectoryStore` that records every persistence call, so tests
/// can assert on exactly what the engine wrote.
#[derive(Default)]
pub struct InMemoryDirectory {
    pub references: Mutex<HashMap<ReferenceKind, Vec<ReferenceEntry>>>,
    pub employees: Mutex<HashMap<i64, Employee>>,
    pub inserts: Mutex<Vec<NewEmployee>>,
    pub updates: Mutex<Vec<(i64, EmployeeUpdate)>>,
    pub refresh_calls: Mutex<usize>,
    /// Ids whose insert/update is rejected, to exercise row isolation.
    pub fail_writes_for: Mutex<Vec<i64>>,
    /// When set, reference reads fail, to exercise batch-fatal behavior.
    pub fail_reference_reads: Mutex<bool>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(self, kind: ReferenceKind, entries: &[(i64, &str)]) -> Self {
        self.references.lock().unwrap().insert(
            kind,
            entries
                .iter()
                .map(|(id, name)| ReferenceEntry {
                    id: *id,
                    name: (*name).to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn seed_employee(&self, employee: Employee) {
        self.employees.lock().unwrap().insert(employee.id, employee);
    }

    pub fn fail_writes_for(&self, id: i64) {
        self.fail_writes_for.lock().unwrap().push(id);
    }

    pub fn fail_reference_reads(&self) {
        *self.fail_reference_reads.lock().unwrap() = true;
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn refresh_count(&self) -> usize {
        *self.refresh_calls.lock().unwrap()
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn list_reference(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceEntry>, StoreError> {
        if *self.fail_reference_reads.lock().unwrap() {
            return Err(StoreError::Backend(format!(
                "reference table {kind} unavailable"
            )));
        }
        Ok(self
            .references
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_employees_by_ids(&self, ids: &[i64]) -> Result<Vec<Employee>, StoreError> {
        let employees = self.employees.lock().unwrap();
        Ok(ids.iter().filter_map(|id| employees.get(id).cloned()).collect())
    }

    async fn insert_employee(&self, new: NewEmployee) -> Result<(), StoreError> {
        if self.fail_writes_for.lock().unwrap().contains(&new.id) {
            return Err(StoreError::Backend(format!("insert rejected for {}", new.id)));
        }
        let mut employees = self.employees.lock().unwrap();
        if employees.contains_key(&new.id) {
            return Err(StoreError::Backend(format!("duplicate id {}", new.id)));
        }
        employees.insert(new.id, employee_from_new(&new));
        self.inserts.lock().unwrap().push(new);
        Ok(())
    }

    async fn update_employee(&self, id: i64, update: EmployeeUpdate) -> Result<(), StoreError> {
        if self.fail_writes_for.lock().unwrap().contains(&id) {
            return Err(StoreError::Backend(format!("update rejected for {id}")));
        }
        let mut employees = self.employees.lock().unwrap();
        let Some(stored) = employees.get_mut(&id) else {
            return Err(StoreError::Backend(format!("no employee {id}")));
        };
        apply_update(stored, &update);
        self.updates.lock().unwrap().push((id, update));
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let mut all: Vec<Employee> = self.employees.lock().unwrap().values().cloned().collect();
        all.sort_by_key(|e| e.id);
        Ok(all)
    }

    async fn refresh_directory(&self) -> Result<(), StoreError> {
        *self.refresh_calls.lock().unwrap() += 1;
        Ok(())
    }
}

fn employee_from_new(new: &NewEmployee) -> Employee {
    Employee {
        id: new.id,
        name: new.name.clone(),
        email: new.email.clone(),
        role: new.role.clone(),
        phone: new.phone.clone(),
        national_id: new.national_id.clone(),
        gender: new.gender.clone(),
        hire_date: new.hire_date,
        birth_date: new.birth_date,
        age: new.age,
        blood_type: new.blood_type.clone(),
        contract_type: new.contract_type.clone(),
        address: new.address.clone(),
        status: Some(new.status.clone()),
        termination_reason: new.termination_reason.clone(),
        termination_date: new.termination_date,
        company_id: new.company_id,
        branch_id: new.branch_id,
        position_id: new.position_id,
        health_provider_id: new.health_provider_id,
        pension_fund_id: new.pension_fund_id,
        severance_fund_id: new.severance_fund_id,
        compensation_fund_id: new.compensation_fund_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn apply_update(stored: &mut Employee, update: &EmployeeUpdate) {
    if let Some(v) = &update.name {
        stored.name = Some(v.clone());
    }
    if let Some(v) = &update.email {
        stored.email = Some(v.clone());
    }
    if let Some(v) = &update.role {
        stored.role = Some(v.clone());
    }
    if let Some(v) = &update.phone {
        stored.phone = Some(v.clone());
    }
    if let Some(v) = &update.national_id {
        stored.national_id = Some(v.clone());
    }
    if let Some(v) = &update.gender {
        stored.gender = Some(v.clone());
    }
    if let Some(v) = update.hire_date {
        stored.hire_date = Some(v);
    }
    if let Some(v) = update.birth_date {
        stored.birth_date = Some(v);
    }
    if let Some(v) = update.age {
        stored.age = Some(v);
    }
    if let Some(v) = &update.blood_type {
        stored.blood_type = Some(v.clone());
    }
    if let Some(v) = &update.contract_type {
        stored.contract_type = Some(v.clone());
    }
    if let Some(v) = &update.address {
        stored.address = Some(v.clone());
    }
    if let Some(v) = &update.status {
        stored.status = Some(v.clone());
    }
    if let Some(v) = &update.termination_reason {
        stored.termination_reason = Some(v.clone());
    }
    if let Some(v) = update.termination_date {
        stored.termination_date = Some(v);
    }
    if let Some(v) = update.company_id {
        stored.company_id = v;
    }
    if let Some(v) = update.branch_id {
        stored.branch_id = v;
    }
    if let Some(v) = update.position_id {
        stored.position_id = v;
    }
    if let Some(v) = update.health_provider_id {
        stored.health_provider_id = v;
    }
    if let Some(v) = update.pension_fund_id {
        stored.pension_fund_id = v;
    }
    if let Some(v) = update.severance_fund_id {
        stored.severance_fund_id = v;
    }
    if let Some(v) = update.compensation_fund_id {
        stored.compensation_fund_id = v;
    }
    stored.updated_at = Utc::now();
}

/// A stored employee with only id and status set, for seeding.
pub fn stored_employee(id: i64) -> Employee {
    Employee {
        id,
        name: None,
        email: None,
        role: None,
        phone: None,
        national_id: None,
        gender: None,
        hire_date: None,
        birth_date: None,
        age: None,
        blood_type: None,
        contract_type: None,
        address: None,
        status: Some("activo".to_string()),
        termination_reason: None,
        termination_date: None,
        company_id: None,
        branch_id: None,
        position_id: None,
        health_provider_id: None,
        pension_fund_id: None,
        severance_fund_id: None,
        compensation_fund_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

pub fn number(value: f64) -> CellValue {
    CellValue::Number(value)
}

pub fn row(cells: &[(&str, CellValue)]) -> ImportRow {
    cells
        .iter()
        .map(|(label, value)| ((*label).to_string(), value.clone()))
        .collect()
}
