use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable audit record of a single stock movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub material: String,
    pub quantity: f64,
    #[serde(flatten)]
    pub movement: Movement,
    #[serde(default)]
    pub remarks: String,
}

impl Transaction {
    pub fn new(
        timestamp: DateTime<Utc>,
        category: impl Into<String>,
        material: impl Into<String>,
        quantity: f64,
        movement: Movement,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            category: category.into(),
            material: material.into(),
            quantity,
            movement,
            remarks: remarks.into(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.movement.kind()
    }
}

/// Direction of a movement plus its kind-specific counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Movement {
    Receipt { source: String },
    Consumption { purpose: String },
    Transfer { destination: String },
}

impl Movement {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Movement::Receipt { .. } => TransactionKind::Receipt,
            Movement::Consumption { .. } => TransactionKind::Consumption,
            Movement::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    /// Source, purpose or destination depending on the kind.
    pub fn counterpart(&self) -> &str {
        match self {
            Movement::Receipt { source } => source,
            Movement::Consumption { purpose } => purpose,
            Movement::Transfer { destination } => destination,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Receipt,
    Consumption,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Receipt => "receipt",
            TransactionKind::Consumption => "consumption",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn movement_is_flattened_with_a_kind_tag() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let txn = Transaction::new(
            ts,
            "general_materials",
            "cement",
            50.0,
            Movement::Receipt {
                source: "Dealer".into(),
            },
            "",
        );
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["kind"], "receipt");
        assert_eq!(value["source"], "Dealer");
        assert!(value.get("movement").is_none());

        let parsed: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, txn);
        assert_eq!(parsed.kind(), TransactionKind::Receipt);
    }

    #[test]
    fn counterpart_follows_kind() {
        let transfer = Movement::Transfer {
            destination: "Head Office".into(),
        };
        assert_eq!(transfer.counterpart(), "Head Office");
        assert_eq!(transfer.kind().to_string(), "transfer");
    }
}
