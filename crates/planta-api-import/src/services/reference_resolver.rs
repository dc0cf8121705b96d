//! Reference-name resolution.
//!
//! Loads every foreign-entity reference table once per batch and builds
//! case- and accent-insensitive name → id indices. The resulting catalog is
//! an immutable value handed into row processing; batches never share one.

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use planta_db::models::{ReferenceEntry, ReferenceKind};

use crate::store::{DirectoryStore, StoreError};

/// Normalize a display name for lookup: trim, casefold, NFD-decompose and
/// drop combining diacritical marks, so "Bogotá " and "BOGOTA" collide.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normalized-name → id index for one reference table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: HashMap<String, i64>,
}

impl ReferenceIndex {
    /// Build an index from reference rows.
    ///
    /// Collision policy: the first row observed for a normalized key wins.
    /// Rows arrive in ascending id order, so the tie-break is deterministic.
    #[must_use]
    pub fn build(rows: &[ReferenceEntry]) -> Self {
        let mut entries = HashMap::with_capacity(rows.len());
        for row in rows {
            entries.entry(normalize_name(&row.name)).or_insert(row.id);
        }
        Self { entries }
    }

    /// Resolve a display name to an id.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.entries.get(&normalize_name(name)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable per-batch bundle of all reference indices, plus the reverse
/// id → display-name maps the export path uses.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    indices: HashMap<ReferenceKind, ReferenceIndex>,
    names: HashMap<ReferenceKind, HashMap<i64, String>>,
}

impl ReferenceCatalog {
    /// Load all reference tables concurrently and index them.
    ///
    /// Any single table failure aborts the load; a partial catalog is never
    /// returned.
    pub async fn load(store: &dyn DirectoryStore) -> Result<Self, StoreError> {
        let (companies, branches, positions, health, pension, severance, compensation) =
            tokio::try_join!(
                store.list_reference(ReferenceKind::Company),
                store.list_reference(ReferenceKind::Branch),
                store.list_reference(ReferenceKind::Position),
                store.list_reference(ReferenceKind::HealthProvider),
                store.list_reference(ReferenceKind::PensionFund),
                store.list_reference(ReferenceKind::SeveranceFund),
                store.list_reference(ReferenceKind::CompensationFund),
            )?;

        let mut catalog = Self::default();
        for (kind, rows) in [
            (ReferenceKind::Company, companies),
            (ReferenceKind::Branch, branches),
            (ReferenceKind::Position, positions),
            (ReferenceKind::HealthProvider, health),
            (ReferenceKind::PensionFund, pension),
            (ReferenceKind::SeveranceFund, severance),
            (ReferenceKind::CompensationFund, compensation),
        ] {
            catalog.index(kind, &rows);
        }
        Ok(catalog)
    }

    /// Build a catalog from preloaded rows.
    #[must_use]
    pub fn from_rows(tables: &[(ReferenceKind, Vec<ReferenceEntry>)]) -> Self {
        let mut catalog = Self::default();
        for (kind, rows) in tables {
            catalog.index(*kind, rows);
        }
        catalog
    }

    fn index(&mut self, kind: ReferenceKind, rows: &[ReferenceEntry]) {
        self.names.insert(
            kind,
            rows.iter().map(|r| (r.id, r.name.clone())).collect(),
        );
        self.indices.insert(kind, ReferenceIndex::build(rows));
    }

    /// Resolve a display name against one reference table.
    #[must_use]
    pub fn resolve(&self, kind: ReferenceKind, name: &str) -> Option<i64> {
        self.indices.get(&kind).and_then(|index| index.resolve(name))
    }

    /// Reverse lookup: display name for a stored relation id.
    #[must_use]
    pub fn display_name(&self, kind: ReferenceKind, id: i64) -> Option<&str> {
        self.names
            .get(&kind)
            .and_then(|names| names.get(&id))
            .map(String::as_str)
    }
}
