#![warn(missing_docs)]

//! Penetrating, exit-aware scene casting.
//!
//! Facade over the pierce crates:
//!
//! - [`pierce_scene`]: hit events, collision channels and the
//!   [`SceneCast`] primitive, with a parry3d-backed [`SceneWorld`].
//! - [`pierce_query`]: penetrating casts that report exits as well as
//!   entrances.
//! - [`pierce_depletion`]: strength and speed budgets spent along those
//!   casts, including ricochet chains.
//!
//! # Example
//!
//! ```ignore
//! use pierce::{penetrate, Channel, NerfStack, QueryConfig, SceneCastRequest, Strength, UniformNerf};
//!
//! let world = pierce::SceneDescription::from_json(&json)?.build()?;
//! let request = SceneCastRequest::new(start, end, Channel::PROJECTILE);
//! let result = penetrate::<Strength, _, _>(
//!     &world,
//!     &request,
//!     2.0,
//!     &mut NerfStack::new(),
//!     &UniformNerf(0.05),
//!     &QueryConfig::default(),
//! );
//! println!("{} strength left at {:?}", result.info.stop_value, result.info.stop);
//! ```

pub use pierce_depletion;
pub use pierce_math;
pub use pierce_query;
pub use pierce_scene;

pub use pierce_depletion::{
    deplete_along, deplete_cast, penetrate, penetrate_with_range_falloff, ricochet_cast,
    ricochet_cast_with_range_falloff, CastInfo, ChainInfo, ChainLimits, ChainResult, DefaultRules,
    DepletionRules, NerfStack, ResourceHit, ResourceKind, SegmentResult, Speed, SpeedHit, Strength,
    StrengthHit, UniformNerf,
};
pub use pierce_math::{Point3, Rotation, Vec3, WALL_AVOIDANCE_PADDING};
pub use pierce_query::{
    penetration_scene_cast, penetration_scene_cast_with_exit_hits, scene_cast_with_exit_hits,
    ExitAwareCast, ExitAwareHit, PenetrationCast, QueryConfig, QueryError,
};
pub use pierce_scene::{
    CastShape, Channel, CollisionResponse, HitEvent, MaterialId, ObjectId, QueryParams,
    ResponseContainer, SceneCast, SceneCastRequest, SceneDescription, SceneError, SceneWorld,
};

#[cfg(test)]
mod scenarios;
