pub mod json_backend;
pub mod legacy;

use std::{collections::HashSet, path::PathBuf};

use chrono::{DateTime, Utc};

use crate::{errors::StoreError, inventory::Snapshot};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends capable of storing inventory snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Loads the persisted snapshot, falling back to `seed` when nothing usable exists.
    /// Never fails: unreadable data is reported through [`LoadOutcome::Recovered`].
    fn load(&self, seed: Snapshot) -> LoadReport;

    /// Replaces the persisted snapshot. Readers never observe a partial write.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Writes a timestamped copy of `snapshot` without touching the primary file.
    fn backup(&self, snapshot: &Snapshot, label: Option<&str>, at: DateTime<Utc>)
        -> Result<PathBuf>;

    /// Lists existing backups, newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>>;
}

/// How the snapshot handed back by [`SnapshotStore::load`] was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No persisted file existed.
    Seeded,
    /// A file in the flat pre-schema layout was converted.
    Migrated,
    /// The persisted file could not be used and a seeded snapshot replaced it.
    Recovered { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub snapshot: Snapshot,
    pub outcome: LoadOutcome,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn seeded(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            outcome: LoadOutcome::Seeded,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub label: Option<String>,
    /// 1 for the first backup of a second, `N` for its `-N` copies.
    pub attempt: u32,
}

/// Detects anomalies in a parsed snapshot that do not prevent it from being used.
pub fn snapshot_warnings(snapshot: &Snapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut category_names = HashSet::new();

    for category in &snapshot.categories {
        if !category_names.insert(category.name.as_str()) {
            warnings.push(format!("category `{}` appears more than once", category.name));
        }
        let mut material_names = HashSet::new();
        for material in &category.materials {
            if !material_names.insert(material.name.as_str()) {
                warnings.push(format!(
                    "material `{}` appears more than once in `{}`",
                    material.name, category.name
                ));
            }
            let counters = [
                ("in_stock", material.in_stock),
                ("consumed", material.consumed),
                ("transferred", material.transferred),
                ("minimum_stock", material.minimum_stock),
            ];
            for (field, value) in counters {
                if !value.is_finite() || value < 0.0 {
                    warnings.push(format!(
                        "material `{}` in `{}` has invalid {} {}",
                        material.name, category.name, field, value
                    ));
                }
            }
        }
    }

    for txn in &snapshot.transactions {
        if snapshot.material(&txn.category, &txn.material).is_none() {
            warnings.push(format!(
                "transaction {} references unknown material `{}` in `{}`",
                txn.id, txn.material, txn.category
            ));
        }
        if !(txn.quantity.is_finite() && txn.quantity > 0.0) {
            warnings.push(format!(
                "transaction {} has non-positive quantity {}",
                txn.id, txn.quantity
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Movement, Transaction, GENERAL_MATERIALS};

    #[test]
    fn clean_seed_has_no_warnings() {
        let snapshot = Snapshot::seeded("Site", Utc::now());
        assert!(snapshot_warnings(&snapshot).is_empty());
    }

    #[test]
    fn flags_negative_stock_and_dangling_transactions() {
        let mut snapshot = Snapshot::seeded("Site", Utc::now());
        snapshot.categories[0].materials[0].in_stock = -3.0;
        snapshot.transactions.push(Transaction::new(
            Utc::now(),
            GENERAL_MATERIALS,
            "unobtainium",
            1.0,
            Movement::Consumption {
                purpose: "slab".into(),
            },
            "",
        ));
        let warnings = snapshot_warnings(&snapshot);
        assert_eq!(warnings.len(), 2, "unexpected warnings: {warnings:?}");
        assert!(warnings[0].contains("invalid in_stock"));
        assert!(warnings[1].contains("unobtainium"));
    }
}
