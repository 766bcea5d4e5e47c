//! End-to-end casts through described scenes.

use approx::assert_relative_eq;
use parry3d::shape::SharedShape;
use pierce_math::Isometry3;
use proptest::prelude::*;

use crate::*;

fn scene(json: &str) -> SceneWorld {
    SceneDescription::from_json(json).unwrap().build().unwrap()
}

fn ray_x(from: f32, to: f32) -> SceneCastRequest {
    SceneCastRequest::new(
        Point3::new(from, 0.0, 0.0),
        Point3::new(to, 0.0, 0.0),
        Channel::PROJECTILE,
    )
}

const SLAB: &str = r#"{
    "objects": [
        {
            "name": "slab",
            "shape": { "type": "cuboid", "half_extents": [5.0, 50.0, 50.0] },
            "translation": [10.0, 0.0, 0.0],
            "material": "concrete"
        }
    ]
}"#;

#[test]
fn slab_costs_thickness_times_nerf() {
    let world = scene(SLAB);
    let result = penetrate::<Strength, _, _>(
        &world,
        &ray_x(0.0, 30.0),
        2.0,
        &mut NerfStack::new(),
        &UniformNerf(0.05),
        &QueryConfig::default(),
    );
    assert_eq!(result.hits.len(), 2);
    assert!(!result.hits[0].is_exit);
    assert!(result.hits[1].is_exit);
    assert_relative_eq!(result.hits[1].distance - result.hits[0].distance, 10.0, epsilon = 1e-3);
    assert_relative_eq!(result.hits[1].value, 1.5, epsilon = 1e-4);
    assert_relative_eq!(result.info.stop_value, 1.5, epsilon = 1e-4);
    assert_eq!(result.info.stop, Point3::new(30.0, 0.0, 0.0));
    assert_eq!(result.hits[0].material, world.material_id("concrete"));
}

#[test]
fn slab_exhausts_strength_midway() {
    let world = scene(SLAB);
    let result = penetrate::<Strength, _, _>(
        &world,
        &ray_x(0.0, 30.0),
        0.3,
        &mut NerfStack::new(),
        &UniformNerf(0.05),
        &QueryConfig::default(),
    );
    let entrance = &result.hits[0];
    assert_eq!(result.hits.len(), 1);
    assert_relative_eq!(result.info.distance_to_stop - entrance.distance, 6.0, epsilon = 1e-3);
    assert_eq!(result.info.stop_value, 0.0);
    assert_relative_eq!(
        (result.info.stop - result.info.start).norm(),
        result.info.distance_to_stop,
        epsilon = 1e-4
    );
}

#[test]
fn ball_exit_found_with_tight_reverse_start() {
    let mut world = SceneWorld::new();
    world.add_object("ball", SharedShape::ball(2.0), Isometry3::translation(10.0, 0.0, 0.0));
    let cast = penetration_scene_cast_with_exit_hits(
        &world,
        &ray_x(0.0, 100.0),
        |_| false,
        &QueryConfig::default(),
    );
    assert_eq!(cast.hits.len(), 2);
    assert_relative_eq!(cast.hits[0].distance, 8.0, epsilon = 1e-3);
    assert_relative_eq!(cast.hits[1].distance, 12.0, epsilon = 1e-3);
    assert!(cast.hits[1].is_exit);
}

#[test]
fn sphere_sweep_through_slab() {
    let world = scene(SLAB);
    let request = ray_x(0.0, 30.0).with_shape(CastShape::Sphere { radius: 0.5 }, Rotation::identity());
    let cast = penetration_scene_cast_with_exit_hits(&world, &request, |_| false, &QueryConfig::default());
    assert_eq!(cast.hits.len(), 2);
    // Sweeps go through GJK, which is only accurate to a few thousandths.
    assert_relative_eq!(cast.hits[0].position.x, 4.5, epsilon = 5e-3);
    assert_relative_eq!(cast.hits[1].position.x, 15.5, epsilon = 5e-3);
    assert!(cast.hits[1].is_exit);
}

#[test]
fn overlap_only_object_is_penetrated_by_plain_cast() {
    let json = r#"{
        "objects": [
            {
                "name": "foliage",
                "shape": { "type": "cuboid", "half_extents": [1.0, 50.0, 50.0] },
                "translation": [5.0, 0.0, 0.0],
                "responses": [ { "channel": 6, "response": "overlap" } ]
            },
            {
                "name": "wall",
                "shape": { "type": "cuboid", "half_extents": [1.0, 50.0, 50.0] },
                "translation": [15.0, 0.0, 0.0]
            }
        ]
    }"#;
    let world = scene(json);
    let cast = scene_cast_with_exit_hits(&world, &ray_x(0.0, 30.0), &QueryConfig::default());
    let kinds: Vec<(ObjectId, bool, bool)> = cast
        .hits
        .iter()
        .map(|h| (h.object, h.is_exit, h.blocking))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (ObjectId(0), false, false),
            (ObjectId(0), true, false),
            (ObjectId(1), false, true),
        ]
    );
    assert_eq!(cast.stop, Some(2));
}

#[test]
fn bullet_ricochets_off_rotated_plate() {
    let json = r#"{
        "objects": [
            {
                "name": "plate",
                "shape": { "type": "cuboid", "half_extents": [0.5, 20.0, 20.0] },
                "translation": [20.5, 0.0, 0.0],
                "rotation_deg": [0.0, 0.0, -45.0],
                "material": "steel"
            }
        ]
    }"#;
    let world = scene(json);
    let steel = world.material_id("steel");

    struct Steel(Option<MaterialId>);
    impl DepletionRules for Steel {
        fn is_ricochetable(&self, hit: &HitEvent) -> bool {
            hit.material == self.0
        }
        fn ricochet_nerf(&self, _hit: &HitEvent) -> f32 {
            100.0
        }
    }

    let chain = ricochet_cast::<Speed, _, _>(
        &world,
        &ray_x(0.0, 1.0),
        900.0,
        &mut NerfStack::new(),
        &Steel(steel),
        &ChainLimits::new(100.0).with_ricochet_cap(2),
        &QueryConfig::default(),
    );
    assert_eq!(chain.segments.len(), 2);
    assert_eq!(chain.ricochet_count(), 1);
    let second = &chain.segments[1];
    // Head-on along +X off a face whose normal is (-1, 1, 0) / sqrt(2) turns to +Y.
    assert_relative_eq!(second.info.direction, Vec3::y(), epsilon = 1e-4);
    assert_relative_eq!(chain.info.stop_value, 800.0, epsilon = 1e-3);
    assert_relative_eq!(chain.info.distance_traveled, 100.0, epsilon = 1e-3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn disjoint_slabs_pair_up(
        layout in prop::collection::vec((1.0f32..5.0, 0.5f32..4.0), 1..5),
        nerf in 0.0f32..0.2,
    ) {
        let mut world = SceneWorld::new();
        let mut x = 0.0f32;
        for (i, (gap, thickness)) in layout.iter().enumerate() {
            x += gap;
            world.add_object(
                format!("slab{i}"),
                SharedShape::cuboid(thickness / 2.0, 20.0, 20.0),
                Isometry3::translation(x + thickness / 2.0, 0.0, 0.0),
            );
            x += thickness;
        }
        let request = ray_x(0.0, x + 5.0);
        let mut nerfs = NerfStack::new();
        let result = penetrate::<Strength, _, _>(
            &world,
            &request,
            1000.0,
            &mut nerfs,
            &UniformNerf(nerf),
            &QueryConfig::default(),
        );

        prop_assert_eq!(result.hits.len(), 2 * layout.len());
        for (i, hit) in result.hits.iter().enumerate() {
            prop_assert_eq!(hit.is_exit, i % 2 == 1);
        }
        prop_assert!(nerfs.is_empty());

        let direction = request.direction();
        for pair in result.hits.windows(2) {
            prop_assert!(direction.dot(&(pair[1].position - pair[0].position)) >= 0.0);
            prop_assert!(pair[1].value <= pair[0].value);
        }
        prop_assert!(result.info.stop_value <= result.info.start_value);
        let travelled = (result.info.stop - result.info.start).norm();
        prop_assert!((travelled - result.info.distance_to_stop).abs() < 1e-3);
    }
}
