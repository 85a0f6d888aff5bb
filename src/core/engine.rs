use std::{path::PathBuf, sync::Arc};

use tracing::{debug, error, info};

use crate::core::clock::Clock;
use crate::core::services::{
    LowStockAlert, ReportService, ServiceResult, StockService, UsageReport,
    DEFAULT_TRANSACTION_LIMIT,
};
use crate::errors::{LedgerError, StoreError};
use crate::inventory::{Category, Material, NewMaterial, Snapshot, Transaction};
use crate::storage::{BackupInfo, LoadOutcome, LoadReport, SnapshotStore};

/// Facade that owns the live snapshot and keeps it in step with the store.
///
/// Every mutating call is applied to a working copy, persisted, and only then
/// made current. A failed save therefore leaves both memory and disk exactly
/// as they were before the call.
pub struct LedgerEngine {
    snapshot: Snapshot,
    store: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    outcome: LoadOutcome,
    load_warnings: Vec<String>,
}

impl LedgerEngine {
    /// Loads the persisted inventory, seeding a fresh one for `site_name` when
    /// nothing usable is on disk.
    pub fn open(store: Box<dyn SnapshotStore>, clock: Arc<dyn Clock>, site_name: &str) -> Self {
        let seed = Snapshot::seeded(site_name, clock.now());
        let LoadReport {
            snapshot,
            outcome,
            warnings,
        } = store.load(seed);
        info!(
            site = %snapshot.site.site_name,
            categories = snapshot.categories.len(),
            transactions = snapshot.transaction_count(),
            outcome = ?outcome,
            "inventory opened"
        );
        Self {
            snapshot,
            store,
            clock,
            outcome,
            load_warnings: warnings,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn site_name(&self) -> &str {
        &self.snapshot.site.site_name
    }

    pub fn categories(&self) -> &[Category] {
        &self.snapshot.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.snapshot.category(name.trim())
    }

    pub fn material(&self, category: &str, material: &str) -> Option<&Material> {
        self.snapshot.material(category.trim(), material.trim())
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn receive(
        &mut self,
        category: &str,
        material: &str,
        quantity: f64,
        source: &str,
        remarks: &str,
        new_material: Option<NewMaterial>,
    ) -> Result<Transaction, LedgerError> {
        let txn = self.commit("receive", |snapshot, now| {
            StockService::receive(
                snapshot,
                category,
                material,
                quantity,
                source,
                remarks,
                new_material,
                now,
            )
        })?;
        log_movement(&txn);
        Ok(txn)
    }

    pub fn consume(
        &mut self,
        category: &str,
        material: &str,
        quantity: f64,
        purpose: &str,
        remarks: &str,
    ) -> Result<Transaction, LedgerError> {
        let txn = self.commit("consume", |snapshot, now| {
            StockService::consume(snapshot, category, material, quantity, purpose, remarks, now)
        })?;
        log_movement(&txn);
        Ok(txn)
    }

    pub fn transfer(
        &mut self,
        category: &str,
        material: &str,
        quantity: f64,
        destination: &str,
        remarks: &str,
    ) -> Result<Transaction, LedgerError> {
        let txn = self.commit("transfer", |snapshot, now| {
            StockService::transfer(
                snapshot,
                category,
                material,
                quantity,
                destination,
                remarks,
                now,
            )
        })?;
        log_movement(&txn);
        Ok(txn)
    }

    pub fn add_material(
        &mut self,
        category: &str,
        material: &str,
        details: NewMaterial,
    ) -> Result<Material, LedgerError> {
        let added = self.commit("add_material", |snapshot, now| {
            StockService::add_material(snapshot, category, material, details, now)
        })?;
        info!(category = category.trim(), material = %added.name, unit = %added.unit, "material added");
        Ok(added)
    }

    pub fn add_category(&mut self, name: &str) -> Result<(), LedgerError> {
        self.commit("add_category", |snapshot, now| {
            StockService::add_category(snapshot, name, now)
        })?;
        info!(category = name.trim(), "category added");
        Ok(())
    }

    pub fn check_low_stock(&self) -> Vec<LowStockAlert> {
        ReportService::low_stock(&self.snapshot)
    }

    /// Most recent first. `None` uses the default of ten entries.
    pub fn list_transactions(&self, limit: Option<usize>) -> Vec<&Transaction> {
        ReportService::recent_transactions(
            &self.snapshot,
            limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT),
        )
    }

    pub fn generate_report(&self, category: &str) -> Result<UsageReport, LedgerError> {
        let name = category.trim();
        self.snapshot
            .category(name)
            .map(ReportService::usage_report)
            .ok_or_else(|| LedgerError::CategoryNotFound(name.to_string()))
    }

    pub fn generate_reports(&self) -> Vec<UsageReport> {
        ReportService::usage_reports(&self.snapshot)
    }

    /// Writes a timestamped copy of the current snapshot. The primary file is untouched.
    pub fn backup(&self, label: Option<&str>) -> Result<PathBuf, StoreError> {
        self.store.backup(&self.snapshot, label, self.clock.now())
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, StoreError> {
        self.store.list_backups()
    }

    /// Persists the current state without changing it.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.snapshot)
    }

    fn commit<T, F>(&mut self, operation: &str, mutate: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Snapshot, chrono::DateTime<chrono::Utc>) -> ServiceResult<T>,
    {
        let mut working = self.snapshot.clone();
        let value = match mutate(&mut working, self.clock.now()) {
            Ok(value) => value,
            Err(err) => {
                debug!(operation, reason = %err, "operation rejected");
                return Err(err);
            }
        };
        if let Err(err) = self.store.save(&working) {
            error!(operation, error = %err, "save failed; change discarded");
            return Err(LedgerError::Persistence(err));
        }
        self.snapshot = working;
        Ok(value)
    }
}

fn log_movement(txn: &Transaction) {
    info!(
        kind = %txn.kind(),
        category = %txn.category,
        material = %txn.material,
        quantity = txn.quantity,
        "stock movement recorded"
    );
}
