//! Hit events reported by scene casts.

use pierce_math::{safe_normal, Point3, Vec3};

/// Identity of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Identity of a surface material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// One surface crossing found by a scene cast.
#[derive(Debug, Clone, PartialEq)]
pub struct HitEvent {
    /// Location of the cast shape's origin at the time of the hit.
    pub position: Point3,
    /// Point of contact on the surface.
    pub impact_point: Point3,
    /// Surface normal at the contact, pointing away from the surface.
    pub normal: Vec3,
    /// Distance from `trace_start` to `position`.
    pub distance: f32,
    /// Fraction along the trace, in `[0, 1]`.
    pub time: f32,
    /// Start of the cast that produced this hit.
    pub trace_start: Point3,
    /// End of the cast that produced this hit.
    pub trace_end: Point3,
    /// Object that was hit.
    pub object: ObjectId,
    /// Material of the surface, if the object has one.
    pub material: Option<MaterialId>,
    /// The cast started inside this object.
    pub start_penetrating: bool,
    /// Blocking response, as opposed to overlap.
    pub blocking: bool,
}

impl HitEvent {
    /// Unit direction of the trace that produced this hit.
    pub fn trace_direction(&self) -> Vec3 {
        safe_normal(&(self.trace_end - self.trace_start))
    }
}
