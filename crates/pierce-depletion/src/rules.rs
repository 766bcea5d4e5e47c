//! Caller policy for how hits affect the resource.

use pierce_scene::HitEvent;

/// How surfaces attenuate a cast and which ones stop or deflect it.
///
/// Every method has a neutral default: nothing attenuates, nothing
/// ricochets, everything can be penetrated.
pub trait DepletionRules {
    /// Resource lost per unit distance while inside the object of `hit`.
    fn per_distance_nerf(&self, _hit: &HitEvent) -> f32 {
        0.0
    }

    /// Resource lost once when ricocheting off `hit`.
    fn ricochet_nerf(&self, _hit: &HitEvent) -> f32 {
        0.0
    }

    /// The cast bounces off `hit` instead of entering.
    fn is_ricochetable(&self, _hit: &HitEvent) -> bool {
        false
    }

    /// The cast stops at `hit`.
    fn is_impenetrable(&self, _hit: &HitEvent) -> bool {
        false
    }
}

/// Rules with every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRules;

impl DepletionRules for DefaultRules {}

/// Same per-distance nerf for every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformNerf(pub f32);

impl DepletionRules for UniformNerf {
    fn per_distance_nerf(&self, _hit: &HitEvent) -> f32 {
        self.0
    }
}
