//! Fixtures shared by the unit tests.

use parry3d::shape::SharedShape;
use pierce_math::{Isometry3, Point3, Vec3};
use pierce_scene::{Channel, HitEvent, ObjectId, SceneCastRequest, SceneWorld};

/// Hit on object 0 of a trace along the X axis.
pub fn hit_on_x(start: f32, end: f32, at: f32) -> HitEvent {
    hit_on_x_for(ObjectId(0), start, end, at)
}

/// Hit on `object` of a trace along the X axis.
pub fn hit_on_x_for(object: ObjectId, start: f32, end: f32, at: f32) -> HitEvent {
    let distance = (at - start).abs();
    HitEvent {
        position: Point3::new(at, 0.0, 0.0),
        impact_point: Point3::new(at, 0.0, 0.0),
        normal: Vec3::x() * -(end - start).signum(),
        distance,
        time: distance / (end - start).abs(),
        trace_start: Point3::new(start, 0.0, 0.0),
        trace_end: Point3::new(end, 0.0, 0.0),
        object,
        material: None,
        start_penetrating: false,
        blocking: true,
    }
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
