//! Employee directory export.
//!
//! Produces a CSV whose headers are the import column vocabulary, with
//! relation ids resolved back to display names, so an exported file
//! re-imports cleanly.

use chrono::NaiveDate;

use planta_db::models::{Employee, ReferenceKind};

use crate::error::ImportError;
use crate::services::reference_resolver::ReferenceCatalog;
use crate::store::DirectoryStore;

/// Export headers, in file order.
const HEADERS: [&str; 23] = [
    "ID",
    "Nombre",
    "Email",
    "Rol",
    "Teléfono",
    "Cédula",
    "Género",
    "Fecha Ingreso",
    "Fecha Nacimiento",
    "Edad",
    "Grupo Sanguíneo",
    "Tipo Contrato",
    "Dirección",
    "Estado",
    "Motivo Retiro",
    "Fecha Retiro",
    "Empresa",
    "Sede",
    "Cargo",
    "EPS",
    "Fondo Pensión",
    "Fondo Cesantías",
    "Caja Compensación",
];

/// Render the whole directory as a CSV document.
pub async fn export_directory(store: &dyn DirectoryStore) -> Result<Vec<u8>, ImportError> {
    let (catalog, employees) = tokio::try_join!(
        async {
            ReferenceCatalog::load(store)
                .await
                .map_err(ImportError::ReferenceLoad)
        },
        async { store.list_employees().await.map_err(ImportError::Store) },
    )?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADERS)
        .map_err(|e| ImportError::Export(e.to_string()))?;

    for employee in &employees {
        writer
            .write_record(record_for(employee, &catalog))
            .map_err(|e| ImportError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ImportError::Export(e.to_string()))
}

fn record_for(employee: &Employee, catalog: &ReferenceCatalog) -> Vec<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let date = |value: Option<NaiveDate>| {
        value
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    let relation = |kind: ReferenceKind, id: Option<i64>| {
        id.and_then(|id| catalog.display_name(kind, id))
            .map(str::to_string)
            .unwrap_or_default()
    };

    vec![
        employee.id.to_string(),
        text(&employee.name),
        text(&employee.email),
        text(&employee.role),
        text(&employee.phone),
        text(&employee.national_id),
        text(&employee.gender),
        date(employee.hire_date),
        date(employee.birth_date),
        employee.age.map(|a| a.to_string()).unwrap_or_default(),
        text(&employee.blood_type),
        text(&employee.contract_type),
        text(&employee.address),
        text(&employee.status),
        text(&employee.termination_reason),
        date(employee.termination_date),
        relation(ReferenceKind::Company, employee.company_id),
        relation(ReferenceKind::Branch, employee.branch_id),
        relation(ReferenceKind::Position, employee.position_id),
        relation(ReferenceKind::HealthProvider, employee.health_provider_id),
        relation(ReferenceKind::PensionFund, employee.pension_fund_id),
        relation(ReferenceKind::SeveranceFund, employee.severance_fund_id),
        relation(ReferenceKind::CompensationFund, employee.compensation_fund_id),
    ]
}
