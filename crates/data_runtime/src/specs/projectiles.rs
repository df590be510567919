//! Projectile and charge tuning (server-side defaults).

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProjectileTuning {
    /// Bolts vanish after this long without a hit.
    pub bolt_life_s: f32,
    /// Rockets self-detonate after this long.
    pub rocket_life_s: f32,
    /// Planted charge fuse.
    pub charge_fuse_s: f32,
    pub charge_damage: i32,
    pub charge_radius: f32,
    /// Per-owner live charge cap; planting past it detonates the oldest.
    pub max_charges_per_owner: usize,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            bolt_life_s: 2.0,
            rocket_life_s: 8.0,
            charge_fuse_s: 3.0,
            charge_damage: 120,
            charge_radius: 180.0,
            max_charges_per_owner: 5,
        }
    }
}

impl ProjectileTuning {
    /// Load `data/config/projectiles.toml` or fall back to defaults.
    pub fn load_default() -> Result<Self> {
        let loaded = crate::loader::load_toml_opt::<Self>("config/projectiles.toml")
            .context("load projectile config")?;
        Ok(loaded.unwrap_or_default())
    }
}
