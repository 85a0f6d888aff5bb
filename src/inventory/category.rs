use serde::{Deserialize, Serialize};

use super::material::Material;

/// Named group of materials. Materials keep their insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
        }
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.name == name)
    }

    pub fn material_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials
            .iter_mut()
            .find(|material| material.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.material(name).is_some()
    }

    /// Appends a material. Callers check for duplicates first.
    pub(crate) fn push(&mut self, material: Material) -> &mut Material {
        self.materials.push(material);
        let last = self.materials.len() - 1;
        &mut self.materials[last]
    }
}
