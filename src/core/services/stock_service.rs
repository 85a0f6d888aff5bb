//! Stock movement rules applied directly to a snapshot. Nothing here touches disk.

use chrono::{DateTime, Utc};

use crate::errors::LedgerError;
use crate::inventory::{Category, Material, Movement, NewMaterial, Snapshot, Transaction};

use super::{normalize_name, validate_quantity, validate_threshold, ServiceResult};

/// Validated receipt, consumption, transfer and catalogue helpers.
pub struct StockService;

impl StockService {
    /// Adds `quantity` to a material's stock, creating the material from
    /// `new_material` when the category does not track it yet.
    #[allow(clippy::too_many_arguments)]
    pub fn receive(
        snapshot: &mut Snapshot,
        category: &str,
        material: &str,
        quantity: f64,
        source: &str,
        remarks: &str,
        new_material: Option<NewMaterial>,
        now: DateTime<Utc>,
    ) -> ServiceResult<Transaction> {
        let quantity = validate_quantity(quantity)?;
        let category_name = normalize_name("category", category)?;
        let material_name = normalize_name("material", material)?;

        let entry = snapshot
            .category_mut(&category_name)
            .ok_or_else(|| LedgerError::CategoryNotFound(category_name.clone()))?;

        if !entry.contains(&material_name) {
            let details = new_material.ok_or_else(|| LedgerError::MaterialNotFound {
                category: category_name.clone(),
                material: material_name.clone(),
            })?;
            entry.push(build_material(&material_name, details)?);
        }
        let record = entry
            .material_mut(&material_name)
            .ok_or_else(|| LedgerError::MaterialNotFound {
                category: category_name.clone(),
                material: material_name.clone(),
            })?;
        record.in_stock += quantity;

        let txn = Transaction::new(
            now,
            category_name,
            material_name,
            quantity,
            Movement::Receipt {
                source: source.trim().to_string(),
            },
            remarks.trim(),
        );
        Ok(record_transaction(snapshot, txn, now))
    }

    /// Records project usage. Fails without side effects if stock is short.
    pub fn consume(
        snapshot: &mut Snapshot,
        category: &str,
        material: &str,
        quantity: f64,
        purpose: &str,
        remarks: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Transaction> {
        Self::issue(
            snapshot,
            category,
            material,
            quantity,
            Outbound::Consumption,
            purpose,
            remarks,
            now,
        )
    }

    /// Records stock sent to another site or office.
    pub fn transfer(
        snapshot: &mut Snapshot,
        category: &str,
        material: &str,
        quantity: f64,
        destination: &str,
        remarks: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Transaction> {
        Self::issue(
            snapshot,
            category,
            material,
            quantity,
            Outbound::Transfer,
            destination,
            remarks,
            now,
        )
    }

    /// Registers a zeroed material. Existing names are never overwritten.
    pub fn add_material(
        snapshot: &mut Snapshot,
        category: &str,
        material: &str,
        details: NewMaterial,
        now: DateTime<Utc>,
    ) -> ServiceResult<Material> {
        let category_name = normalize_name("category", category)?;
        let material_name = normalize_name("material", material)?;
        let created = build_material(&material_name, details)?;

        let entry = snapshot
            .category_mut(&category_name)
            .ok_or_else(|| LedgerError::CategoryNotFound(category_name.clone()))?;
        if entry.contains(&material_name) {
            return Err(LedgerError::DuplicateMaterial {
                category: category_name,
                material: material_name,
            });
        }
        let added = entry.push(created).clone();
        snapshot.touch(now);
        Ok(added)
    }

    pub fn add_category(
        snapshot: &mut Snapshot,
        name: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let category_name = normalize_name("category", name)?;
        if snapshot.category(&category_name).is_some() {
            return Err(LedgerError::DuplicateCategory(category_name));
        }
        snapshot.categories.push(Category::new(category_name));
        snapshot.touch(now);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn issue(
        snapshot: &mut Snapshot,
        category: &str,
        material: &str,
        quantity: f64,
        outbound: Outbound,
        counterpart: &str,
        remarks: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<Transaction> {
        let quantity = validate_quantity(quantity)?;
        let category_name = normalize_name("category", category)?;
        let material_name = normalize_name("material", material)?;

        let record = snapshot
            .category_mut(&category_name)
            .and_then(|entry| entry.material_mut(&material_name))
            .ok_or_else(|| LedgerError::MaterialNotFound {
                category: category_name.clone(),
                material: material_name.clone(),
            })?;

        if quantity > record.in_stock {
            return Err(LedgerError::InsufficientStock {
                material: material_name,
                available: record.in_stock,
                requested: quantity,
            });
        }

        record.in_stock -= quantity;
        let counterpart = counterpart.trim().to_string();
        let movement = match outbound {
            Outbound::Consumption => {
                record.consumed += quantity;
                Movement::Consumption {
                    purpose: counterpart,
                }
            }
            Outbound::Transfer => {
                record.transferred += quantity;
                Movement::Transfer {
                    destination: counterpart,
                }
            }
        };

        let txn = Transaction::new(
            now,
            category_name,
            material_name,
            quantity,
            movement,
            remarks.trim(),
        );
        Ok(record_transaction(snapshot, txn, now))
    }
}

#[derive(Debug, Clone, Copy)]
enum Outbound {
    Consumption,
    Transfer,
}

fn build_material(name: &str, details: NewMaterial) -> ServiceResult<Material> {
    let unit = normalize_name("unit", &details.unit)?;
    let minimum = validate_threshold("minimum_stock", details.minimum_stock)?;
    let unit_size = details
        .unit_size
        .map(|size| validate_threshold("unit_size", size))
        .transpose()?;
    Ok(Material::new(name, unit, minimum).with_unit_size(unit_size))
}

fn record_transaction(snapshot: &mut Snapshot, txn: Transaction, now: DateTime<Utc>) -> Transaction {
    snapshot.transactions.push(txn.clone());
    snapshot.touch(now);
    txn
}
