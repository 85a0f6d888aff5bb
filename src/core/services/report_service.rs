use crate::inventory::{Category, Snapshot, Transaction};

pub const DEFAULT_TRANSACTION_LIMIT: usize = 10;
pub const TOP_CONSUMED_LIMIT: usize = 3;

/// A material at or below its minimum stock level.
#[derive(Debug, Clone, PartialEq)]
pub struct LowStockAlert {
    pub category: String,
    pub material: String,
    pub current_stock: f64,
    pub minimum_stock: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRank {
    pub material: String,
    pub consumed: f64,
    pub unit: String,
}

/// Aggregate usage figures for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    pub category: String,
    pub material_types: usize,
    pub total_in_stock: f64,
    pub total_consumed: f64,
    pub total_transferred: f64,
    /// Most consumed materials, highest first, zero consumption excluded.
    pub top_consumed: Vec<ConsumptionRank>,
}

/// Derived read-only views over a snapshot.
pub struct ReportService;

impl ReportService {
    /// Alerts in category order, then material insertion order.
    pub fn low_stock(snapshot: &Snapshot) -> Vec<LowStockAlert> {
        snapshot
            .categories
            .iter()
            .flat_map(|category| {
                category
                    .materials
                    .iter()
                    .filter(|material| material.is_low_stock())
                    .map(move |material| LowStockAlert {
                        category: category.name.clone(),
                        material: material.name.clone(),
                        current_stock: material.in_stock,
                        minimum_stock: material.minimum_stock,
                        unit: material.unit.clone(),
                    })
            })
            .collect()
    }

    /// The last `limit` transactions, most recent first.
    pub fn recent_transactions(snapshot: &Snapshot, limit: usize) -> Vec<&Transaction> {
        snapshot.transactions.iter().rev().take(limit).collect()
    }

    pub fn usage_report(category: &Category) -> UsageReport {
        let materials = &category.materials;

        let mut ranked: Vec<ConsumptionRank> = materials
            .iter()
            .filter(|material| material.consumed > 0.0)
            .map(|material| ConsumptionRank {
                material: material.name.clone(),
                consumed: material.consumed,
                unit: material.unit.clone(),
            })
            .collect();
        // Stable: ties keep insertion order.
        ranked.sort_by(|a, b| b.consumed.total_cmp(&a.consumed));
        ranked.truncate(TOP_CONSUMED_LIMIT);

        UsageReport {
            category: category.name.clone(),
            material_types: materials.len(),
            total_in_stock: materials.iter().map(|m| m.in_stock).sum(),
            total_consumed: materials.iter().map(|m| m.consumed).sum(),
            total_transferred: materials.iter().map(|m| m.transferred).sum(),
            top_consumed: ranked,
        }
    }

    pub fn usage_reports(snapshot: &Snapshot) -> Vec<UsageReport> {
        snapshot.categories.iter().map(Self::usage_report).collect()
    }
}
