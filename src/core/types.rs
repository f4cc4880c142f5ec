use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Material coefficients that affect mass and bounce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub restitution: f64,
    pub density: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self::testing()
    }
}

impl Material {
    pub const fn new(restitution: f64, density: f64) -> Self {
        Self {
            restitution,
            density,
        }
    }

    pub const fn testing() -> Self {
        Self::new(0.5, 1.0)
    }

    pub const fn rock() -> Self {
        Self::new(0.1, 0.6)
    }

    pub const fn wood() -> Self {
        Self::new(0.2, 0.3)
    }

    pub const fn metal() -> Self {
        Self::new(0.05, 1.2)
    }

    pub const fn bouncy_ball() -> Self {
        Self::new(0.8, 0.3)
    }

    pub const fn super_ball() -> Self {
        Self::new(0.95, 0.3)
    }

    pub const fn pillow() -> Self {
        Self::new(0.2, 0.1)
    }

    /// Restitution clamped to `[0, 1]`.
    pub fn clamped_restitution(&self) -> f64 {
        self.restitution.clamp(0.0, 1.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.density.is_finite() && self.density > 0.0 {
            Ok(())
        } else {
            Err(PhysicsError::InvalidDensity(self.density))
        }
    }
}

/// Named material lookup handed to spawning code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialTable {
    materials: BTreeMap<String, Material>,
}

impl Default for MaterialTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("testing", Material::testing());
        table.insert("rock", Material::rock());
        table.insert("wood", Material::wood());
        table.insert("metal", Material::metal());
        table.insert("bouncy_ball", Material::bouncy_ball());
        table.insert("super_ball", Material::super_ball());
        table.insert("pillow", Material::pillow());
        table
    }
}

impl MaterialTable {
    pub fn empty() -> Self {
        Self {
            materials: BTreeMap::new(),
        }
    }

    /// Adds or replaces a material, returning the previous entry.
    pub fn insert(&mut self, name: impl Into<String>, material: Material) -> Option<Material> {
        self.materials.insert(name.into(), material)
    }

    pub fn get(&self, name: &str) -> Result<Material> {
        self.materials
            .get(name)
            .copied()
            .ok_or_else(|| PhysicsError::UnknownMaterial(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Coefficients mixed from the two bodies of a contact pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPairProperties {
    pub restitution: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
}

impl MaterialPairProperties {
    /// Restitution takes the minimum, friction the geometric mean.
    pub fn combine(
        restitution: (f64, f64),
        static_friction: (f64, f64),
        dynamic_friction: (f64, f64),
    ) -> Self {
        Self {
            restitution: restitution.0.min(restitution.1),
            static_friction: geometric_mean(static_friction.0, static_friction.1),
            dynamic_friction: geometric_mean(dynamic_friction.0, dynamic_friction.1),
        }
    }
}

fn geometric_mean(a: f64, b: f64) -> f64 {
    (a.max(0.0) * b.max(0.0)).sqrt()
}
