use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{category::Category, material::Material, transaction::Transaction};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

pub const GENERAL_MATERIALS: &str = "general_materials";
pub const PAINT_MATERIALS: &str = "paint_materials";

/// (name, unit, minimum stock, pack size)
type SeedRow = (&'static str, &'static str, f64, Option<f64>);

const GENERAL_SEED: &[SeedRow] = &[
    ("cement", "bags", 10.0, None),
    ("M sand fine", "cubic_meters", 5.0, None),
    ("engine oil", "liters", 20.0, None),
    ("Spider Kits", "pieces", 5.0, None),
    ("Rope 14mm", "meters", 100.0, None),
    ("Roller 6 Inch", "pieces", 10.0, None),
    ("Roller 4 Inch", "pieces", 10.0, None),
    ("Roller 9 Inch int", "pieces", 5.0, None),
    ("Roller 9 Inch ext", "pieces", 5.0, None),
    ("Putty Blade 4 inch", "pieces", 15.0, None),
    ("Putty Blade 8 inch", "pieces", 10.0, None),
    ("Sanding Paper Grit220", "sheets", 50.0, None),
    ("Masking Tape 1 inch", "rolls", 20.0, None),
    ("Brush 2 inch", "pieces", 10.0, None),
    ("Brush 4 inch", "pieces", 10.0, None),
    ("Brush 6 inch", "pieces", 5.0, None),
    ("Goggles", "pieces", 10.0, None),
    ("Nose Mask", "pieces", 50.0, None),
    ("safety gloves", "pairs", 20.0, None),
    ("Helmet", "pieces", 10.0, None),
];

const PAINT_SEED: &[SeedRow] = &[
    ("Zydex White Primer 20L", "liters", 5.0, Some(20.0)),
    ("Zydex ZycoSil+ 20L", "liters", 3.0, Some(20.0)),
    ("Zydex ZycoPrime+", "liters", 3.0, Some(20.0)),
    ("AP SMARTCARE CRACKSEAL", "kg", 10.0, Some(5.0)),
    ("AP Smooth Putty", "kg", 5.0, Some(40.0)),
    ("AP Acrylic Putty", "kg", 5.0, Some(20.0)),
    ("Asian Apex Suprema", "liters", 3.0, Some(20.0)),
    ("Asian Tractor Emulsion", "liters", 5.0, Some(20.0)),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteInfo {
    pub site_name: String,
    pub last_updated: DateTime<Utc>,
}

/// Complete inventory state: categories, their materials and the movement log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default = "Snapshot::schema_version_default")]
    pub schema_version: u8,
    pub site: SiteInfo,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn empty(site_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            site: SiteInfo {
                site_name: site_name.into(),
                last_updated: now,
            },
            categories: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// First-run snapshot with the standard general and paint catalogues, all zeroed.
    pub fn seeded(site_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let mut snapshot = Self::empty(site_name, now);
        snapshot
            .categories
            .push(seed_category(GENERAL_MATERIALS, GENERAL_SEED));
        snapshot
            .categories
            .push(seed_category(PAINT_MATERIALS, PAINT_SEED));
        snapshot
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories
            .iter_mut()
            .find(|category| category.name == name)
    }

    pub fn material(&self, category: &str, material: &str) -> Option<&Material> {
        self.category(category)?.material(material)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.site.last_updated = now;
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

fn seed_category(name: &str, rows: &[SeedRow]) -> Category {
    let mut category = Category::new(name);
    for (material, unit, minimum, unit_size) in rows {
        category.push(Material::new(*material, *unit, *minimum).with_unit_size(*unit_size));
    }
    category
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn seeded_snapshot_has_two_zeroed_catalogues() {
        let snapshot = Snapshot::seeded("L&T Site", now());
        let names: Vec<_> = snapshot.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![GENERAL_MATERIALS, PAINT_MATERIALS]);
        assert_eq!(snapshot.categories[0].materials.len(), 20);
        assert_eq!(snapshot.categories[1].materials.len(), 8);
        assert!(snapshot
            .categories
            .iter()
            .flat_map(|c| &c.materials)
            .all(|m| m.in_stock == 0.0 && m.consumed == 0.0 && m.transferred == 0.0));
        assert!(snapshot.transactions.is_empty());
    }

    #[test]
    fn seed_keeps_pack_sizes_for_paint() {
        let snapshot = Snapshot::seeded("Site", now());
        let primer = snapshot
            .material(PAINT_MATERIALS, "Zydex White Primer 20L")
            .expect("primer seeded");
        assert_eq!(primer.unit_size, Some(20.0));
        let cement = snapshot.material(GENERAL_MATERIALS, "cement").unwrap();
        assert_eq!(cement.unit_size, None);
        assert_eq!(cement.minimum_stock, 10.0);
    }
}
