//! Resource kinds and the hits that carry them.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Deref;

use pierce_query::ExitAwareHit;

/// A scalar budget depleted along a cast.
pub trait ResourceKind: Debug + Clone + Copy + PartialEq + Default {
    /// Name used in logs and reports.
    const NAME: &'static str;
}

/// Generic penetration strength.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Strength;

impl ResourceKind for Strength {
    const NAME: &'static str = "strength";
}

/// Projectile speed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Speed;

impl ResourceKind for Speed {
    const NAME: &'static str = "speed";
}

/// An entrance or exit annotated with the resource left at it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceHit<R: ResourceKind> {
    /// The entrance or exit.
    pub hit: ExitAwareHit,
    /// Resource remaining when the cast reached this hit.
    pub value: f32,
    /// Index of the ricochet segment this hit belongs to.
    pub ricochet_number: u32,
    /// The cast bounced off this hit.
    pub is_ricochet: bool,
    /// Distance covered by earlier segments of the chain.
    pub distance_traveled_before_this_cast: f32,
    kind: PhantomData<R>,
}

impl<R: ResourceKind> ResourceHit<R> {
    /// A first-segment hit with `value` remaining.
    pub fn new(hit: ExitAwareHit, value: f32) -> Self {
        Self {
            hit,
            value,
            ricochet_number: 0,
            is_ricochet: false,
            distance_traveled_before_this_cast: 0.0,
            kind: PhantomData,
        }
    }

    /// Distance from the start of the chain to this hit.
    pub fn total_distance_traveled(&self) -> f32 {
        self.distance_traveled_before_this_cast + self.hit.distance
    }
}

impl<R: ResourceKind> Deref for ResourceHit<R> {
    type Target = ExitAwareHit;

    fn deref(&self) -> &ExitAwareHit {
        &self.hit
    }
}

/// Hit carrying remaining strength.
pub type StrengthHit = ResourceHit<Strength>;

/// Hit carrying remaining speed.
pub type SpeedHit = ResourceHit<Speed>;
