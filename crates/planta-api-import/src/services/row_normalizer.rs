//! Row normalization: raw spreadsheet rows into typed, sparse employee rows.
//!
//! One explicit parser per recognized column; unrecognized columns are
//! ignored. Column labels are matched after the same trim/casefold/
//! accent-strip normalization used for reference names, so "Teléfono" and
//! "telefono" are the same column.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use planta_db::models::ReferenceKind;

use crate::models::{CellValue, ImportRow};
use crate::services::reference_resolver::{normalize_name, ReferenceCatalog};

/// Recognized column labels, in normalized form.
mod columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "nombre";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "rol";
    pub const PHONE: &str = "telefono";
    pub const NATIONAL_ID: &str = "cedula";
    pub const GENDER: &str = "genero";
    pub const HIRE_DATE: &str = "fecha ingreso";
    pub const BIRTH_DATE: &str = "fecha nacimiento";
    pub const AGE: &str = "edad";
    pub const BLOOD_TYPE: &str = "grupo sanguineo";
    pub const CONTRACT_TYPE: &str = "tipo contrato";
    pub const ADDRESS: &str = "direccion";
    pub const STATUS: &str = "estado";
    pub const TERMINATION_REASON: &str = "motivo retiro";
    pub const TERMINATION_DATE: &str = "fecha retiro";
    pub const COMPANY: &str = "empresa";
    pub const BRANCH: &str = "sede";
    pub const POSITION: &str = "cargo";
    pub const HEALTH_PROVIDER: &str = "eps";
    pub const PENSION_FUND: &str = "fondo pension";
    pub const SEVERANCE_FUND: &str = "fondo cesantias";
    pub const COMPENSATION_FUND: &str = "caja compensacion";
}

/// Status value that marks an employee inactive.
const STATUS_INACTIVE: &str = "inactivo";

/// Minimum length for a role cell to be accepted.
const MIN_ROLE_LEN: usize = 3;

/// Accepted text date formats.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Employment status of a normalized row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    /// Stored representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "activo",
            EmployeeStatus::Inactive => "inactivo",
        }
    }
}

/// A typed, sparse projection of one import row.
///
/// `None` means the column was absent or blank, and the reconciler leaves
/// the stored field unchanged; a blank cell therefore cannot clear a stored
/// value. Relation fields are doubly optional: the outer level is column
/// presence, the inner level is whether the name resolved to a reference id
/// (`Some(None)` is an explicit no-relation). Status is the one exception to
/// sparseness: an absent `estado` column normalizes to active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedEmployeeRow {
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
    pub status: EmployeeStatus,
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

/// Parse one raw row.
///
/// Returns a row-level error message when the row must be excluded; the
/// caller records it and moves on without aborting the batch.
pub fn normalize_row(
    raw: &ImportRow,
    catalog: &ReferenceCatalog,
) -> Result<NormalizedEmployeeRow, String> {
    let cells = index_cells(raw);

    let id = match cells.get(columns::ID) {
        None => return Err("ID is required".to_string()),
        Some(cell) => parse_id(cell)?,
    };

    let role = match text_field(&cells, columns::ROLE) {
        Some(role) if role.chars().count() < MIN_ROLE_LEN => {
            return Err(format!("invalid role: {role}"));
        }
        other => other,
    };

    let status = match text_field(&cells, columns::STATUS) {
        Some(value) if normalize_name(&value) == STATUS_INACTIVE => EmployeeStatus::Inactive,
        _ => EmployeeStatus::Active,
    };

    Ok(NormalizedEmployeeRow {
        id,
        name: text_field(&cells, columns::NAME),
        email: text_field(&cells, columns::EMAIL),
        role,
        phone: text_field(&cells, columns::PHONE),
        national_id: text_field(&cells, columns::NATIONAL_ID),
        gender: text_field(&cells, columns::GENDER),
        hire_date: date_field(&cells, columns::HIRE_DATE)?,
        birth_date: date_field(&cells, columns::BIRTH_DATE)?,
        age: cells.get(columns::AGE).and_then(|cell| parse_age(cell)),
        blood_type: text_field(&cells, columns::BLOOD_TYPE),
        contract_type: text_field(&cells, columns::CONTRACT_TYPE),
        address: text_field(&cells, columns::ADDRESS),
        status,
        termination_reason: text_field(&cells, columns::TERMINATION_REASON),
        termination_date: date_field(&cells, columns::TERMINATION_DATE)?,
        company_id: relation_field(&cells, columns::COMPANY, ReferenceKind::Company, catalog),
        branch_id: relation_field(&cells, columns::BRANCH, ReferenceKind::Branch, catalog),
        position_id: relation_field(&cells, columns::POSITION, ReferenceKind::Position, catalog),
        health_provider_id: relation_field(
            &cells,
            columns::HEALTH_PROVIDER,
            ReferenceKind::HealthProvider,
            catalog,
        ),
        pension_fund_id: relation_field(
            &cells,
            columns::PENSION_FUND,
            ReferenceKind::PensionFund,
            catalog,
        ),
        severance_fund_id: relation_field(
            &cells,
            columns::SEVERANCE_FUND,
            ReferenceKind::SeveranceFund,
            catalog,
        ),
        compensation_fund_id: relation_field(
            &cells,
            columns::COMPENSATION_FUND,
            ReferenceKind::CompensationFund,
            catalog,
        ),
    })
}

/// Lenient identifier pre-scan used for the per-batch snapshot read. Rows
/// whose id does not parse are left to error during normalization.
pub(crate) fn extract_id(raw: &ImportRow) -> Option<i64> {
    let cells = index_cells(raw);
    cells.get(columns::ID).and_then(|cell| parse_id(cell).ok())
}

/// Index a row's cells by normalized label. Duplicate labels keep the first
/// occurrence; unrecognized labels simply never get looked up.
fn index_cells(raw: &ImportRow) -> HashMap<String, &CellValue> {
    let mut cells = HashMap::with_capacity(raw.len());
    for (label, value) in raw {
        cells.entry(normalize_name(label)).or_insert(value);
    }
    cells
}

fn parse_id(cell: &CellValue) -> Result<i64, String> {
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 => Ok(*n as i64),
        CellValue::Number(n) => Err(format!("invalid ID: {n}")),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err("ID is required".to_string());
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| format!("invalid ID: {trimmed}"))
        }
        CellValue::Date(d) => Err(format!("invalid ID: {d}")),
    }
}

/// Coerce a cell to trimmed text. Blank text yields `None`, so a blank cell
/// behaves exactly like an absent column. Integral numbers print without a
/// fractional part (phone and document columns often arrive numeric).
fn text_of(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        CellValue::Number(n) => Some(format_number(*n)),
        CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn text_field(cells: &HashMap<String, &CellValue>, label: &str) -> Option<String> {
    cells.get(label).and_then(|cell| text_of(cell))
}

/// Day-serial epoch (the conventional 1899-12-30).
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("fixed epoch date")
}

/// Parse a date cell: day-serials count from the 1899-12-30 epoch with any
/// fractional time-of-day truncated; text must match one of `DATE_FORMATS`.
fn parse_date(cell: &CellValue) -> Result<Option<NaiveDate>, String> {
    match cell {
        CellValue::Date(d) => Ok(Some(*d)),
        CellValue::Number(n) => Ok(Some(serial_epoch() + Duration::days(n.trunc() as i64))),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if let Ok(serial) = trimmed.parse::<i64>() {
                return Ok(Some(serial_epoch() + Duration::days(serial)));
            }
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                    return Ok(Some(date));
                }
            }
            Err(format!("invalid date: {trimmed}"))
        }
    }
}

fn date_field(
    cells: &HashMap<String, &CellValue>,
    label: &str,
) -> Result<Option<NaiveDate>, String> {
    match cells.get(label) {
        Some(cell) => parse_date(cell),
        None => Ok(None),
    }
}

// Legacy-lenient: unparseable ages are dropped rather than failing the row.
fn parse_age(cell: &CellValue) -> Option<i32> {
    match cell {
        CellValue::Number(n) => Some(n.trunc() as i32),
        CellValue::Text(s) => s.trim().parse::<i32>().ok(),
        CellValue::Date(_) => None,
    }
}

/// Resolve a relation column. A present but unresolvable name yields an
/// explicit no-relation, never a row failure.
fn relation_field(
    cells: &HashMap<String, &CellValue>,
    label: &str,
    kind: ReferenceKind,
    catalog: &ReferenceCatalog,
) -> Option<Option<i64>> {
    text_field(cells, label).map(|name| catalog.resolve(kind, &name))
}
