//! Import of inventory files written in the flat pre-schema layout, where each
//! category is a top-level key next to `transactions` and `site_info`, and
//! transactions carry a `type` field and a free-form `date` string.
//!
//! Categories and materials are imported in document order.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::inventory::{Category, Material, Movement, Snapshot, Transaction};

const TRANSACTIONS_KEY: &str = "transactions";
const SITE_INFO_KEY: &str = "site_info";
const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct LegacyRecord {
    #[serde(default)]
    in_stock: f64,
    #[serde(default)]
    consumed: f64,
    #[serde(default)]
    transferred: f64,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    minimum_stock: f64,
    #[serde(default)]
    unit_size: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LegacyTransaction {
    #[serde(default)]
    date: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    category: String,
    material: String,
    quantity: f64,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    purpose: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    remarks: String,
}

#[derive(Debug, Default, Deserialize)]
struct LegacySiteInfo {
    #[serde(default)]
    site_name: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// True when `value` uses the flat layout rather than the current schema.
pub fn is_legacy_layout(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => map.contains_key(SITE_INFO_KEY) && !map.contains_key("site"),
        None => false,
    }
}

/// Converts a flat-layout document. `fallback` supplies the site name and
/// timestamps when the document lacks them. Entries that cannot be converted
/// are skipped and described in the returned warnings.
pub fn import(value: Value, fallback: &Snapshot) -> Result<(Snapshot, Vec<String>), String> {
    let Value::Object(map) = value else {
        return Err("legacy document is not a JSON object".into());
    };
    let mut warnings = Vec::new();

    let site_info: LegacySiteInfo = match map.get(SITE_INFO_KEY) {
        Some(raw) => serde_json::from_value(raw.clone()).map_err(|err| err.to_string())?,
        None => LegacySiteInfo::default(),
    };
    let last_updated = site_info
        .last_updated
        .as_deref()
        .and_then(parse_legacy_date)
        .unwrap_or(fallback.site.last_updated);
    let site_name = site_info
        .site_name
        .unwrap_or_else(|| fallback.site.site_name.clone());

    let mut snapshot = Snapshot::empty(site_name, last_updated);

    for (name, raw) in map.iter() {
        if name == TRANSACTIONS_KEY || name == SITE_INFO_KEY {
            continue;
        }
        let Value::Object(records) = raw else {
            warnings.push(format!("skipped legacy category `{}`: not an object", name));
            continue;
        };
        let mut category = Category::new(name.clone());
        for (material_name, record) in records {
            let record: LegacyRecord = match serde_json::from_value(record.clone()) {
                Ok(record) => record,
                Err(err) => {
                    warnings.push(format!(
                        "skipped legacy material `{}` in `{}`: {}",
                        material_name, name, err
                    ));
                    continue;
                }
            };
            let mut material =
                Material::new(material_name.clone(), record.unit, record.minimum_stock)
                    .with_unit_size(record.unit_size);
            material.in_stock = record.in_stock;
            material.consumed = record.consumed;
            material.transferred = record.transferred;
            category.push(material);
        }
        snapshot.categories.push(category);
    }

    let raw_transactions = match map.get(TRANSACTIONS_KEY) {
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            warnings.push("legacy `transactions` is not a list; ignored".into());
            Vec::new()
        }
        None => Vec::new(),
    };
    for (index, raw) in raw_transactions.into_iter().enumerate() {
        let legacy: LegacyTransaction = match serde_json::from_value(raw) {
            Ok(txn) => txn,
            Err(err) => {
                warnings.push(format!("skipped legacy transaction #{}: {}", index, err));
                continue;
            }
        };
        match convert_transaction(legacy, last_updated) {
            Ok(txn) => snapshot.transactions.push(txn),
            Err(reason) => warnings.push(format!(
                "skipped legacy transaction #{}: {}",
                index, reason
            )),
        }
    }

    Ok((snapshot, warnings))
}

fn convert_transaction(
    legacy: LegacyTransaction,
    fallback: DateTime<Utc>,
) -> Result<Transaction, String> {
    let movement = match legacy.kind.as_str() {
        "receipt" => Movement::Receipt {
            source: legacy.source.unwrap_or_default(),
        },
        "consumption" => Movement::Consumption {
            purpose: legacy.purpose.unwrap_or_default(),
        },
        "transfer" => Movement::Transfer {
            destination: legacy.destination.unwrap_or_default(),
        },
        other => return Err(format!("unknown transaction type `{}`", other)),
    };
    let timestamp = legacy
        .date
        .as_deref()
        .and_then(parse_legacy_date)
        .unwrap_or(fallback);
    Ok(Transaction::new(
        timestamp,
        legacy.category,
        legacy.material,
        legacy.quantity,
        movement,
        legacy.remarks,
    ))
}

fn parse_legacy_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::TransactionKind;
    use serde_json::json;

    fn fallback() -> Snapshot {
        Snapshot::empty("Fallback Site", Utc::now())
    }

    #[test]
    fn detects_flat_layout_only() {
        assert!(is_legacy_layout(&json!({ "site_info": {}, "transactions": [] })));
        let current = serde_json::to_value(fallback()).unwrap();
        assert!(!is_legacy_layout(&current));
    }

    #[test]
    fn imports_categories_and_transactions() {
        let doc = json!({
            "general_materials": {
                "cement": { "in_stock": 5, "consumed": 45, "transferred": 0, "unit": "bags", "minimum_stock": 10 }
            },
            "paint_materials": {
                "AP Smooth Putty": { "in_stock": 2, "consumed": 0, "transferred": 1, "unit": "kg", "unit_size": 40, "minimum_stock": 5 }
            },
            "transactions": [
                { "date": "2024-05-01 08:15:00.123456", "type": "receipt", "category": "general_materials",
                  "material": "cement", "quantity": 50, "source": "Dealer", "remarks": "" },
                { "date": "2024-05-02 10:00:00", "type": "consumption", "category": "general_materials",
                  "material": "cement", "quantity": 45, "purpose": "Slab", "remarks": "first pour" }
            ],
            "site_info": { "site_name": "L&T Site", "last_updated": "2024-05-02 10:00:00.5" }
        });

        let (snapshot, warnings) = import(doc, &fallback()).expect("import legacy");
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(snapshot.site.site_name, "L&T Site");
        assert_eq!(snapshot.categories.len(), 2);

        let cement = snapshot.material("general_materials", "cement").unwrap();
        assert_eq!(cement.in_stock, 5.0);
        assert_eq!(cement.consumed, 45.0);
        let putty = snapshot.material("paint_materials", "AP Smooth Putty").unwrap();
        assert_eq!(putty.unit_size, Some(40.0));

        assert_eq!(snapshot.transactions.len(), 2);
        assert_eq!(snapshot.transactions[1].kind(), TransactionKind::Consumption);
        assert_eq!(snapshot.transactions[1].movement.counterpart(), "Slab");
        assert_eq!(
            snapshot.transactions[0].timestamp.format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 08:15"
        );
    }

    #[test]
    fn keeps_document_order_of_categories_and_materials() {
        let raw = r#"{
            "paint_materials": {
                "Zydex White Primer 20L": { "in_stock": 1, "unit": "buckets", "minimum_stock": 2 }
            },
            "general_materials": {
                "cement": { "in_stock": 0, "unit": "bags", "minimum_stock": 10 },
                "M sand fine": { "in_stock": 0, "unit": "cft", "minimum_stock": 50 },
                "Broken": "not a record",
                "Helmet": { "in_stock": 0, "unit": "nos", "minimum_stock": 5 }
            },
            "transactions": [],
            "site_info": { "site_name": "Ordered Site" }
        }"#;
        let doc: Value = serde_json::from_str(raw).unwrap();

        let (snapshot, warnings) = import(doc, &fallback()).unwrap();
        let categories: Vec<&str> = snapshot.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(categories, vec!["paint_materials", "general_materials"]);
        let materials: Vec<&str> = snapshot.categories[1]
            .materials
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(materials, vec!["cement", "M sand fine", "Helmet"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Broken"), "{warnings:?}");
    }

    #[test]
    fn skips_unknown_transaction_types() {
        let doc = json!({
            "transactions": [
                { "type": "theft", "category": "general_materials", "material": "cement", "quantity": 1 }
            ],
            "site_info": {}
        });
        let (snapshot, warnings) = import(doc, &fallback()).unwrap();
        assert!(snapshot.transactions.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("theft"));
        assert_eq!(snapshot.site.site_name, "Fallback Site");
    }
}
