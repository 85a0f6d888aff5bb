use serde::{Deserialize, Serialize};

/// Stock record for a single material tracked at the site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub in_stock: f64,
    #[serde(default)]
    pub consumed: f64,
    #[serde(default)]
    pub transferred: f64,
    pub unit: String,
    #[serde(default)]
    pub minimum_stock: f64,
    /// Purchase pack size. Informational only, never used in stock arithmetic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_size: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, minimum_stock: f64) -> Self {
        Self {
            name: name.into(),
            in_stock: 0.0,
            consumed: 0.0,
            transferred: 0.0,
            unit: unit.into(),
            minimum_stock,
            unit_size: None,
        }
    }

    pub fn with_unit_size(mut self, unit_size: Option<f64>) -> Self {
        self.unit_size = unit_size;
        self
    }

    pub fn is_low_stock(&self) -> bool {
        self.in_stock <= self.minimum_stock
    }
}

/// Details required to start tracking a material the first time it is received.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaterial {
    pub unit: String,
    pub minimum_stock: f64,
    pub unit_size: Option<f64>,
}

impl NewMaterial {
    pub fn new(unit: impl Into<String>, minimum_stock: f64) -> Self {
        Self {
            unit: unit.into(),
            minimum_stock,
            unit_size: None,
        }
    }
}
