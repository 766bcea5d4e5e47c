//! Exit reconstruction.
//!
//! Scene casts only report where a cast enters an object. Exits are found by
//! casting the same segment backwards, converting those hits into the
//! forward cast's frame and merging them with the entrances.

use pierce_math::{is_ahead_of, Point3, Tolerance, Vec3};
use pierce_scene::{HitEvent, ObjectId, SceneCast, SceneCastRequest};

use crate::config::QueryConfig;
use crate::exit_aware::{ExitAwareCast, ExitAwareHit};
use crate::penetrate::penetration_scene_cast;
use crate::trace::{slide_trace_by_time, trace_length};

/// Where the reverse cast for `request` should start.
///
/// A cast stopped by `stop` is searched backwards from just before it.
/// Otherwise, with `optimize_backwards_length`, from just past the furthest
/// point any entered object could still extend to, never past the cast end.
pub fn backwards_cast_start<S: SceneCast + ?Sized>(
    scene: &S,
    request: &SceneCastRequest,
    entrances: &[HitEvent],
    stop: Option<&HitEvent>,
    config: &QueryConfig,
) -> Point3 {
    let direction = request.direction();
    if let Some(stop) = stop {
        return stop.position - direction * config.wall_avoidance_padding;
    }
    if !config.optimize_backwards_length {
        return request.end;
    }

    let mut furthest_possible_exit = request.start;
    for hit in entrances {
        let radius = scene.body(hit.object).map_or(0.0, |body| body.bounding_radius);
        let candidate = hit.position + direction * (2.0 * radius);
        if is_ahead_of(&direction, &candidate, &furthest_possible_exit) {
            furthest_possible_exit = candidate;
        }
    }

    let start = furthest_possible_exit
        + direction * (request.shape.bounding_sphere_radius() + config.wall_avoidance_padding);
    if is_ahead_of(&direction, &start, &request.end) {
        request.end
    } else {
        start
    }
}

/// First hit of a reverse cast that did not move the cast forward.
fn stalled_object(hits: &[HitEvent], config: &QueryConfig) -> Option<ObjectId> {
    hits.iter()
        .find(|hit| hit.distance <= config.no_progress_distance)
        .map(|hit| hit.object)
}

/// Penetrating cast from `reverse_start` back to `request.start`.
///
/// Hits in the reverse cast's own frame, nearest to `reverse_start` first.
/// A hit that makes no progress gets its object ignored and the cast
/// retried. When retries run out the stalled hits are dropped from the
/// first attempt and it is taken as complete.
pub fn reverse_cast<S: SceneCast + ?Sized>(
    scene: &S,
    request: &SceneCastRequest,
    reverse_start: Point3,
    config: &QueryConfig,
) -> Vec<HitEvent> {
    let mut reverse = request.clone();
    reverse.start = reverse_start;
    reverse.end = request.start;
    reverse.params.find_initial_overlaps = false;

    let first = penetration_scene_cast(scene, &reverse, |_| false).hits;
    let Some(mut stalled) = stalled_object(&first, config) else {
        return first;
    };

    for attempt in 1..=config.max_no_progress_retries {
        log::trace!("Reverse cast stalled on {stalled:?}, retry {attempt}");
        reverse.params.ignored.push(stalled);
        let hits = penetration_scene_cast(scene, &reverse, |_| false).hits;
        match stalled_object(&hits, config) {
            None => return hits,
            Some(object) => stalled = object,
        }
    }

    log::warn!(
        "Reverse cast made no progress after {} retries, treating it as complete",
        config.max_no_progress_retries
    );
    first
        .into_iter()
        .filter(|hit| hit.distance > config.no_progress_distance)
        .collect()
}

/// Express a reverse-cast hit in the frame of the `forward` cast.
pub fn remap_backwards_hit(hit: &mut HitEvent, forward: &SceneCastRequest) {
    let backward_length = trace_length(hit);
    slide_trace_by_time(hit, 1.0, 0.0);
    if backward_length > 0.0 {
        slide_trace_by_time(hit, 0.0, forward.length() / backward_length);
    }
    hit.trace_start = forward.start;
    hit.trace_end = forward.end;
}

/// Merge forward-ordered entrances with reverse-ordered exits.
///
/// `exits` are in reverse-cast order, so they are consumed from the back.
/// An entrance goes first only if the pending exit lies strictly ahead of it.
pub fn order_hits_forwards(
    direction: &Vec3,
    entrances: Vec<HitEvent>,
    mut exits: Vec<HitEvent>,
) -> Vec<ExitAwareHit> {
    let mut ordered = Vec::with_capacity(entrances.len() + exits.len());
    let mut entrances = entrances.into_iter().peekable();
    loop {
        let take_entrance = match (entrances.peek(), exits.last()) {
            (Some(entrance), Some(exit)) => {
                is_ahead_of(direction, &exit.position, &entrance.position)
            }
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_entrance {
            if let Some(entrance) = entrances.next() {
                ordered.push(ExitAwareHit::entrance(entrance));
            }
        } else if let Some(exit) = exits.pop() {
            ordered.push(ExitAwareHit::exit(exit));
        }
    }
    ordered
}

fn add_exits<S: SceneCast + ?Sized>(
    scene: &S,
    request: &SceneCastRequest,
    entrances: Vec<HitEvent>,
    stop: Option<usize>,
    config: &QueryConfig,
) -> ExitAwareCast {
    if config.optimize_backwards_length && entrances.is_empty() {
        return ExitAwareCast::default();
    }

    let direction = request.direction();
    let reverse_start = backwards_cast_start(
        scene,
        request,
        &entrances,
        stop.and_then(|i| entrances.get(i)),
        config,
    );

    let exits = if is_ahead_of(&direction, &reverse_start, &request.start) {
        let mut exits = reverse_cast(scene, request, reverse_start, config);
        for exit in &mut exits {
            remap_backwards_hit(exit, request);
        }
        exits
    } else {
        log::trace!("Reverse cast start is not ahead of the cast start, no exits to find");
        Vec::new()
    };

    let hits = order_hits_forwards(&direction, entrances, exits);
    let stop = stop.and_then(|_| hits.iter().rposition(|hit| !hit.is_exit));
    ExitAwareCast { hits, stop }
}

/// Penetrating cast that reports entrances and exits in forward order.
///
/// The first entrance `is_impenetrable` accepts stops the cast and becomes
/// the last hit of the result. A zero-length cast returns nothing.
pub fn penetration_scene_cast_with_exit_hits<S, F>(
    scene: &S,
    request: &SceneCastRequest,
    is_impenetrable: F,
    config: &QueryConfig,
) -> ExitAwareCast
where
    S: SceneCast + ?Sized,
    F: FnMut(&HitEvent) -> bool,
{
    if Tolerance::DEFAULT.is_zero(request.length()) {
        return ExitAwareCast::default();
    }
    let forward = penetration_scene_cast(scene, request, is_impenetrable);
    add_exits(scene, request, forward.hits, forward.stop, config)
}

/// Ordinary cast, stopping at the first block, that also reports exits.
///
/// Exits are reconstructed for every object entered before the block.
pub fn scene_cast_with_exit_hits<S: SceneCast + ?Sized>(
    scene: &S,
    request: &SceneCastRequest,
    config: &QueryConfig,
) -> ExitAwareCast {
    if Tolerance::DEFAULT.is_zero(request.length()) {
        return ExitAwareCast::default();
    }
    let hits = scene.cast_multi(request);
    let stop = match hits.last() {
        Some(last) if last.blocking => Some(hits.len() - 1),
        _ => None,
    };
    add_exits(scene, request, hits, stop, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit_on_x, hit_on_x_for, ray_x, slabs};
    use approx::assert_relative_eq;
    use parry3d::shape::SharedShape;
    use pierce_math::Isometry3;
    use pierce_scene::{Channel, CollisionBody, CollisionResponse, SceneWorld};
    use std::cell::Cell;

    fn three_slabs() -> SceneWorld {
        slabs(&[(10.0, 2.0), (20.0, 2.0), (30.0, 2.0)])
    }

    fn positions(cast: &ExitAwareCast) -> Vec<(f32, bool)> {
        cast.hits.iter().map(|h| (h.position.x, h.is_exit)).collect()
    }

    #[test]
    fn test_entrances_and_exits_alternate() {
        let world = three_slabs();
        let request = ray_x(0.0, 50.0);
        let cast =
            penetration_scene_cast_with_exit_hits(&world, &request, |_| false, &QueryConfig::default());

        assert_eq!(cast.hits.len(), 6);
        assert!(cast.stop.is_none());
        let expected = [10.0, 12.0, 20.0, 22.0, 30.0, 32.0];
        for (i, hit) in cast.hits.iter().enumerate() {
            assert_eq!(hit.is_exit, i % 2 == 1);
            assert_relative_eq!(hit.position.x, expected[i], epsilon = 1e-3);
            assert_relative_eq!(hit.distance, expected[i], epsilon = 1e-3);
            assert_relative_eq!(hit.time, expected[i] / 50.0, epsilon = 1e-4);
            assert_eq!(hit.trace_start, request.start);
            assert_eq!(hit.trace_end, request.end);
        }
        assert_eq!(cast.hits[1].object, cast.hits[0].object);
        assert_relative_eq!(cast.hits[1].normal, Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_unoptimized_reverse_cast_matches() {
        let world = three_slabs();
        let config = QueryConfig {
            optimize_backwards_length: false,
            ..QueryConfig::default()
        };
        let optimized = penetration_scene_cast_with_exit_hits(
            &world,
            &ray_x(0.0, 50.0),
            |_| false,
            &QueryConfig::default(),
        );
        let plain = penetration_scene_cast_with_exit_hits(&world, &ray_x(0.0, 50.0), |_| false, &config);
        assert_eq!(positions(&optimized).len(), positions(&plain).len());
        for (a, b) in optimized.hits.iter().zip(&plain.hits) {
            assert_eq!(a.is_exit, b.is_exit);
            assert_relative_eq!(a.distance, b.distance, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_impenetrable_hit_is_last() {
        let world = three_slabs();
        let cast = penetration_scene_cast_with_exit_hits(
            &world,
            &ray_x(0.0, 50.0),
            |h| h.object == ObjectId(1),
            &QueryConfig::default(),
        );
        assert_eq!(cast.hits.len(), 3);
        assert_eq!(cast.stop, Some(2));
        let stop = cast.stop_hit().unwrap();
        assert!(!stop.is_exit);
        assert_relative_eq!(stop.distance, 20.0, epsilon = 1e-3);
        assert_eq!(cast.entrance_count(), 2);
        assert_eq!(cast.exit_count(), 1);
    }

    #[test]
    fn test_cast_ending_inside_object_has_no_exit_for_it() {
        let world = three_slabs();
        let cast = penetration_scene_cast_with_exit_hits(
            &world,
            &ray_x(0.0, 21.0),
            |_| false,
            &QueryConfig::default(),
        );
        let kinds: Vec<bool> = cast.hits.iter().map(|h| h.is_exit).collect();
        assert_eq!(kinds, vec![false, true, false]);
    }

    #[test]
    fn test_no_entrances_with_optimization_is_empty() {
        let world = three_slabs();
        let cast = penetration_scene_cast_with_exit_hits(
            &world,
            &ray_x(40.0, 50.0),
            |_| false,
            &QueryConfig::default(),
        );
        assert!(cast.hits.is_empty());
    }

    #[test]
    fn test_start_inside_object() {
        let world = three_slabs();
        let cast = penetration_scene_cast_with_exit_hits(
            &world,
            &ray_x(11.0, 15.0),
            |_| false,
            &QueryConfig::default(),
        );
        assert_eq!(cast.hits.len(), 2);
        assert!(cast.hits[0].start_penetrating);
        assert!(!cast.hits[0].is_exit);
        assert!(cast.hits[1].is_exit);
        assert_relative_eq!(cast.hits[1].distance, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_length_cast_is_empty() {
        let world = three_slabs();
        let cast = penetration_scene_cast_with_exit_hits(
            &world,
            &ray_x(11.0, 11.0),
            |_| false,
            &QueryConfig::default(),
        );
        assert_eq!(cast, ExitAwareCast::default());
    }

    #[test]
    fn test_backwards_start_uses_bounding_radius() {
        let mut world = SceneWorld::new();
        world.add_object("ball", SharedShape::ball(1.0), Isometry3::translation(10.0, 0.0, 0.0));
        let request = ray_x(0.0, 100.0);
        let entrance = hit_on_x(0.0, 100.0, 9.0);
        let config = QueryConfig::default();

        let start = backwards_cast_start(&world, &request, &[entrance.clone()], None, &config);
        assert_relative_eq!(start.x, 11.01, epsilon = 1e-4);

        let stop = backwards_cast_start(&world, &request, &[entrance.clone()], Some(&entrance), &config);
        assert_relative_eq!(stop.x, 8.99, epsilon = 1e-4);

        let short = ray_x(0.0, 11.0);
        let clamped = backwards_cast_start(&world, &short, &[entrance], None, &config);
        assert_eq!(clamped, short.end);
    }

    #[test]
    fn test_remap_backwards_hit() {
        let forward = ray_x(0.0, 50.0);
        // Reverse cast from 32 back to 0 hitting the far face of a slab at 12.
        let mut hit = hit_on_x(32.0, 0.0, 12.0);
        remap_backwards_hit(&mut hit, &forward);
        assert_relative_eq!(hit.distance, 12.0, epsilon = 1e-4);
        assert_relative_eq!(hit.time, 12.0 / 50.0, epsilon = 1e-5);
        assert_eq!(hit.trace_start, forward.start);
        assert_eq!(hit.trace_end, forward.end);
    }

    #[test]
    fn test_order_hits_forwards() {
        let entrances = vec![hit_on_x(0.0, 50.0, 10.0), hit_on_x(0.0, 50.0, 20.0)];
        // Reverse order: furthest first.
        let exits = vec![hit_on_x(30.0, 0.0, 25.0), hit_on_x(30.0, 0.0, 12.0)];
        let merged = order_hits_forwards(&Vec3::x(), entrances, exits);
        let xs: Vec<(f32, bool)> = merged.iter().map(|h| (h.position.x, h.is_exit)).collect();
        assert_eq!(xs, vec![(10.0, false), (12.0, true), (20.0, false), (25.0, true)]);
    }

    #[test]
    fn test_order_tie_puts_exit_first() {
        let entrances = vec![hit_on_x(0.0, 50.0, 10.0)];
        let exits = vec![hit_on_x(30.0, 0.0, 10.0)];
        let merged = order_hits_forwards(&Vec3::x(), entrances, exits);
        assert!(merged[0].is_exit);
        assert!(!merged[1].is_exit);
    }

    #[test]
    fn test_scene_cast_with_exit_hits_stops_at_block() {
        let mut world = three_slabs();
        world
            .object_mut(ObjectId(0))
            .unwrap()
            .body
            .responses
            .set(Channel::PROJECTILE, CollisionResponse::Overlap);
        let cast = scene_cast_with_exit_hits(&world, &ray_x(0.0, 50.0), &QueryConfig::default());
        let kinds: Vec<(ObjectId, bool)> = cast.hits.iter().map(|h| (h.object, h.is_exit)).collect();
        assert_eq!(
            kinds,
            vec![(ObjectId(0), false), (ObjectId(0), true), (ObjectId(1), false)]
        );
        assert_eq!(cast.stop, Some(2));
        assert!(cast.stop_hit().unwrap().blocking);
    }

    /// Scene whose reverse casts report a zero-distance hit on a phantom object.
    struct StallingScene {
        world: SceneWorld,
        phantom: CollisionBody,
        stall_when_ignored: bool,
        reverse_casts: Cell<usize>,
    }

    const PHANTOM: ObjectId = ObjectId(99);

    impl SceneCast for StallingScene {
        fn cast_multi(&self, request: &SceneCastRequest) -> Vec<HitEvent> {
            let mut hits = self.world.cast_multi(request);
            if !request.params.find_initial_overlaps {
                self.reverse_casts.set(self.reverse_casts.get() + 1);
                if self.stall_when_ignored || !request.params.is_ignored(PHANTOM) {
                    let mut stall = hit_on_x_for(PHANTOM, request.start.x, request.end.x, request.start.x);
                    stall.trace_start = request.start;
                    stall.trace_end = request.end;
                    hits.insert(0, stall);
                }
            }
            hits
        }

        fn body(&self, object: ObjectId) -> Option<&CollisionBody> {
            if object == PHANTOM {
                Some(&self.phantom)
            } else {
                self.world.body(object)
            }
        }
    }

    fn stalling(stall_when_ignored: bool) -> StallingScene {
        StallingScene {
            world: slabs(&[(10.0, 2.0)]),
            phantom: CollisionBody::new(0.0),
            stall_when_ignored,
            reverse_casts: Cell::new(0),
        }
    }

    #[test]
    fn test_no_progress_retry_recovers() {
        let scene = stalling(false);
        let cast = penetration_scene_cast_with_exit_hits(
            &scene,
            &ray_x(0.0, 50.0),
            |_| false,
            &QueryConfig::default(),
        );
        assert_eq!(scene.reverse_casts.get(), 2);
        assert_eq!(cast.hits.len(), 2);
        assert!(cast.hits[1].is_exit);
        assert_relative_eq!(cast.hits[1].distance, 12.0, epsilon = 1e-3);
    }

    #[test]
    fn test_no_progress_retries_exhausted() {
        let scene = stalling(true);
        let config = QueryConfig::default();
        let cast =
            penetration_scene_cast_with_exit_hits(&scene, &ray_x(0.0, 50.0), |_| false, &config);
        assert_eq!(scene.reverse_casts.get(), 1 + config.max_no_progress_retries as usize);
        assert_eq!(cast.hits.len(), 2);
        assert!(cast.hits.iter().all(|h| h.object == ObjectId(0)));
        assert!(cast.hits[1].is_exit);
    }
}
