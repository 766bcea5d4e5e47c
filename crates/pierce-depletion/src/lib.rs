#![warn(missing_docs)]

//! Resource depletion along penetrating casts.
//!
//! A cast carries a scalar budget, strength for generic penetration or
//! speed for projectiles, through the entrances and exits reported by
//! [`pierce_query`]. Inside objects the budget drops per unit distance by
//! the sum of the active [`NerfStack`]. Ricochetable surfaces bounce the
//! cast into a new segment until the budget, the distance cap or the
//! ricochet cap runs out.
//!
//! # Example
//!
//! ```ignore
//! use pierce_depletion::{ricochet_cast, ChainLimits, NerfStack, Speed};
//!
//! let chain = ricochet_cast::<Speed, _, _>(
//!     &world,
//!     &request,
//!     muzzle_speed,
//!     &mut NerfStack::with_range_falloff(0.002),
//!     &materials,
//!     &ChainLimits::new(10_000.0).with_ricochet_cap(3),
//!     &QueryConfig::default(),
//! );
//! println!("stopped at {:?} with {}", chain.info.stop, chain.info.stop_value);
//! ```

mod nerf;
mod resource;
mod ricochet;
mod rules;
mod walk;

#[cfg(test)]
mod testing;

pub use nerf::NerfStack;
pub use resource::{ResourceHit, ResourceKind, Speed, SpeedHit, Strength, StrengthHit};
pub use ricochet::{ricochet_cast, ricochet_cast_with_range_falloff, ChainInfo, ChainLimits, ChainResult};
pub use rules::{DefaultRules, DepletionRules, UniformNerf};
pub use walk::{
    deplete_along, deplete_cast, penetrate, penetrate_with_range_falloff, CastInfo, SegmentResult,
};
