//! TOML run configuration and the material table behind it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use pierce::{DepletionRules, HitEvent, QueryConfig, SceneWorld};
use serde::{Deserialize, Serialize};

/// How a surface material spends and deflects a cast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialProfile {
    /// Resource lost per unit distance inside the material.
    pub per_distance_nerf: f32,
    /// Resource lost once per ricochet off the material.
    pub ricochet_nerf: f32,
    /// Casts bounce off this material.
    pub ricochetable: bool,
    /// Casts stop at this material.
    pub impenetrable: bool,
}

/// Contents of a `pierce.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Resource lost per unit distance everywhere, on top of materials.
    pub range_falloff: f32,
    /// Exit reconstruction tuning.
    pub query: QueryConfig,
    /// Profile for objects with no material or an unlisted one.
    pub default_material: MaterialProfile,
    /// Profiles keyed by material name.
    pub materials: BTreeMap<String, MaterialProfile>,
}

impl RunConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.query.validate()?;
        if config.range_falloff < 0.0 {
            anyhow::bail!("range_falloff must not be negative, got {}", config.range_falloff);
        }
        Ok(config)
    }

    /// Load `path`, or the defaults if no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Warn about configured materials no object in `world` uses.
    pub fn check_materials(&self, world: &SceneWorld) {
        for name in self.materials.keys() {
            if world.material_id(name).is_none() {
                log::warn!("Material {name:?} is configured but not used by the scene");
            }
        }
    }

    /// Depletion rules resolving hits against `world`'s materials.
    pub fn rules<'a>(&'a self, world: &'a SceneWorld) -> MaterialRules<'a> {
        MaterialRules {
            world,
            config: self,
        }
    }
}

/// [`DepletionRules`] looked up by the material of each hit.
#[derive(Clone, Copy)]
pub struct MaterialRules<'a> {
    world: &'a SceneWorld,
    config: &'a RunConfig,
}

impl MaterialRules<'_> {
    fn profile(&self, hit: &HitEvent) -> &MaterialProfile {
        hit.material
            .and_then(|id| self.world.material_name(id))
            .and_then(|name| self.config.materials.get(name))
            .unwrap_or(&self.config.default_material)
    }
}

impl DepletionRules for MaterialRules<'_> {
    fn per_distance_nerf(&self, hit: &HitEvent) -> f32 {
        self.profile(hit).per_distance_nerf
    }

    fn ricochet_nerf(&self, hit: &HitEvent) -> f32 {
        self.profile(hit).ricochet_nerf
    }

    fn is_ricochetable(&self, hit: &HitEvent) -> bool {
        self.profile(hit).ricochetable
    }

    fn is_impenetrable(&self, hit: &HitEvent) -> bool {
        self.profile(hit).impenetrable
    }
}
