#![warn(missing_docs)]

//! Scene cast primitive for pierce.
//!
//! Defines the hit events every higher layer consumes, the collision
//! channel/response model used to classify them, and the [`SceneCast`]
//! trait: a single directed ray or shape query returning crossings sorted
//! by distance. [`SceneWorld`] implements it over static parry3d shapes.
//!
//! # Example
//!
//! ```ignore
//! use pierce_scene::{Channel, SceneCast, SceneCastRequest, SceneDescription};
//!
//! let world = SceneDescription::from_json(&json_str)?.build()?;
//! let request = SceneCastRequest::new(start, end, Channel::PROJECTILE);
//! for hit in world.cast_multi(&request) {
//!     println!("{:?} at {}", hit.object, hit.distance);
//! }
//! ```

mod channel;
mod description;
mod error;
mod hit;
mod query;
mod shape;
mod world;

pub use channel::{Channel, CollisionBody, CollisionResponse, ResponseContainer, CHANNEL_COUNT};
pub use description::{ChannelResponse, ObjectDescription, SceneDescription, ShapeDescription};
pub use error::{Result, SceneError};
pub use hit::{HitEvent, MaterialId, ObjectId};
pub use query::{QueryParams, SceneCast, SceneCastRequest};
pub use shape::CastShape;
pub use world::{SceneObject, SceneWorld};
