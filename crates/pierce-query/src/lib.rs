#![warn(missing_docs)]

//! Penetrating, exit-aware scene casts.
//!
//! A [`SceneCast`](pierce_scene::SceneCast) only reports where a cast enters
//! geometry. This crate builds on it to
//!
//! - collect every entrance along a segment regardless of blocking
//!   responses, optionally cut at the first impenetrable hit
//!   ([`penetration_scene_cast`]),
//! - recover the matching exits with a reverse cast and merge them into
//!   one forward-ordered sequence ([`penetration_scene_cast_with_exit_hits`],
//!   [`scene_cast_with_exit_hits`]).
//!
//! # Example
//!
//! ```ignore
//! use pierce_query::{penetration_scene_cast_with_exit_hits, QueryConfig};
//!
//! let cast = penetration_scene_cast_with_exit_hits(&world, &request, |_| false, &QueryConfig::default());
//! for hit in &cast.hits {
//!     println!("{} {:?} at {}", if hit.is_exit { "exit" } else { "enter" }, hit.object, hit.distance);
//! }
//! ```

mod config;
mod error;
mod exit_aware;
mod exits;
mod penetrate;
mod trace;

#[cfg(test)]
mod testing;

pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use exit_aware::{ExitAwareCast, ExitAwareHit};
pub use exits::{
    backwards_cast_start, order_hits_forwards, penetration_scene_cast_with_exit_hits,
    remap_backwards_hit, reverse_cast, scene_cast_with_exit_hits,
};
pub use penetrate::{penetration_scene_cast, reclassify_hits, PenetrationCast};
pub use trace::{slide_trace_by_time, trace_length};
