//! Shapes a cast can sweep through the scene.

use parry3d::shape::SharedShape;
use pierce_math::{box_bounding_sphere_radius, Vec3};
use serde::{Deserialize, Serialize};

/// Shape swept along a cast. [`CastShape::Line`] is a zero-width ray.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CastShape {
    /// Zero-width ray.
    #[default]
    Line,
    /// Sphere sweep.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
    /// Oriented box sweep.
    Box {
        /// Half extents along the local axes.
        half_extents: [f32; 3],
    },
    /// Capsule sweep aligned with the local Y axis.
    Capsule {
        /// Half length of the capsule's inner segment.
        half_height: f32,
        /// Capsule radius.
        radius: f32,
    },
}

impl CastShape {
    /// Radius of the sphere bounding this shape around its origin.
    pub fn bounding_sphere_radius(&self) -> f32 {
        match *self {
            CastShape::Line => 0.0,
            CastShape::Sphere { radius } => radius,
            CastShape::Box { half_extents } => {
                box_bounding_sphere_radius(&Vec3::from(half_extents))
            }
            CastShape::Capsule {
                half_height,
                radius,
            } => half_height + radius,
        }
    }

    /// Collision shape to sweep, or `None` for a ray.
    pub fn to_shared_shape(&self) -> Option<SharedShape> {
        match *self {
            CastShape::Line => None,
            CastShape::Sphere { radius } => Some(SharedShape::ball(radius)),
            CastShape::Box { half_extents } => Some(SharedShape::cuboid(
                half_extents[0],
                half_extents[1],
                half_extents[2],
            )),
            CastShape::Capsule {
                half_height,
                radius,
            } => Some(SharedShape::capsule_y(half_height, radius)),
        }
    }
}
