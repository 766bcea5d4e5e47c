#![warn(missing_docs)]

//! Math types for pierce scene casting.
//!
//! Thin wrappers around nalgebra providing the single-precision types the
//! scene backend works in, plus the handful of vector helpers the
//! penetration and ricochet code relies on: safe normalization, mirroring
//! about a surface normal, and forward-direction ordering tests.

use nalgebra::{UnitQuaternion, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f32>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f32>;

/// An orientation in 3D space.
pub type Rotation = UnitQuaternion<f32>;

/// A rigid placement (rotation then translation).
pub type Isometry3 = nalgebra::Isometry3<f32>;

/// Distance a cast start is pushed off a surface so it does not begin inside it.
pub const WALL_AVOIDANCE_PADDING: f32 = 0.01;

/// Squared length under which a vector has no usable direction.
const SMALL_NUMBER_SQUARED: f32 = 1e-16;

/// Tolerance for treating scene distances as zero.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in scene units.
    pub linear: f32,
}

impl Tolerance {
    /// Default scene tolerance of 1e-4 units.
    pub const DEFAULT: Self = Self { linear: 1e-4 };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f32) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Normalize `v`, returning the zero vector when it is too short to have a direction.
pub fn safe_normal(v: &Vec3) -> Vec3 {
    let norm_squared = v.norm_squared();
    if norm_squared <= SMALL_NUMBER_SQUARED {
        Vec3::zeros()
    } else {
        v / norm_squared.sqrt()
    }
}

/// Reflect `direction` about the plane with the given `normal`.
///
/// The normal does not need to be unit length.
pub fn mirror_by_vector(direction: &Vec3, normal: &Vec3) -> Vec3 {
    let n = safe_normal(normal);
    direction - n * (2.0 * direction.dot(&n))
}

/// True if `point` lies strictly ahead of `reference` when looking along `direction`.
#[inline]
pub fn is_ahead_of(direction: &Vec3, point: &Point3, reference: &Point3) -> bool {
    direction.dot(&(point - reference)) > 0.0
}

/// Radius of the sphere bounding a box with the given half extents.
pub fn box_bounding_sphere_radius(half_extents: &Vec3) -> f32 {
    half_extents.norm()
}

/// Build a rotation from roll/pitch/yaw given in degrees.
pub fn rotation_from_euler_degrees(roll: f32, pitch: f32, yaw: f32) -> Rotation {
    Rotation::from_euler_angles(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
}
