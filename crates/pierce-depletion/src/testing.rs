//! Fixtures shared by the unit tests.

use parry3d::shape::SharedShape;
use pierce_math::{Isometry3, Point3, Vec3};
use pierce_query::ExitAwareHit;
use pierce_scene::{Channel, HitEvent, ObjectId, SceneCastRequest, SceneWorld};

use crate::rules::DepletionRules;

/// Entrance or exit on object 0 of a trace along the X axis.
pub fn exit_aware_x(start: f32, end: f32, at: f32, is_exit: bool) -> ExitAwareHit {
    let distance = (at - start).abs();
    let hit = HitEvent {
        position: Point3::new(at, 0.0, 0.0),
        impact_point: Point3::new(at, 0.0, 0.0),
        normal: if is_exit { Vec3::x() } else { -Vec3::x() },
        distance,
        time: distance / (end - start).abs(),
        trace_start: Point3::new(start, 0.0, 0.0),
        trace_end: Point3::new(end, 0.0, 0.0),
        object: ObjectId(0),
        material: None,
        start_penetrating: false,
        blocking: true,
    };
    ExitAwareHit { hit, is_exit }
}

/// Scene of slabs perpendicular to X, given as `(near face, thickness)`.
pub fn slabs(faces: &[(f32, f32)]) -> SceneWorld {
    let mut world = SceneWorld::new();
    for (i, (near, thickness)) in faces.iter().enumerate() {
        world.add_object(
            format!("slab{i}"),
            SharedShape::cuboid(thickness / 2.0, 20.0, 20.0),
            Isometry3::translation(near + thickness / 2.0, 0.0, 0.0),
        );
    }
    world
}

/// Ray along X on the projectile channel.
pub fn ray_x(from: f32, to: f32) -> SceneCastRequest {
    SceneCastRequest::new(
        Point3::new(from, 0.0, 0.0),
        Point3::new(to, 0.0, 0.0),
        Channel::PROJECTILE,
    )
}

/// Rules keyed on object identity.
#[derive(Debug, Clone, Default)]
pub struct ObjectRules {
    pub nerf: f32,
    pub ricochet_nerf: f32,
    pub ricochet: Vec<ObjectId>,
    pub impenetrable: Vec<ObjectId>,
}

impl ObjectRules {
    pub fn ricochet_off(objects: &[ObjectId]) -> Self {
        Self {
            ricochet: objects.to_vec(),
            ..Self::default()
        }
    }
}

impl DepletionRules for ObjectRules {
    fn per_distance_nerf(&self, _hit: &HitEvent) -> f32 {
        self.nerf
    }

    fn ricochet_nerf(&self, _hit: &HitEvent) -> f32 {
        self.ricochet_nerf
    }

    fn is_ricochetable(&self, hit: &HitEvent) -> bool {
        self.ricochet.contains(&hit.object)
    }

    fn is_impenetrable(&self, hit: &HitEvent) -> bool {
        self.impenetrable.contains(&hit.object)
    }
}
