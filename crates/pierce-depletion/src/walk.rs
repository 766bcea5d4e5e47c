//! Resource depletion along one cast segment.

use pierce_math::{safe_normal, Point3, Vec3};
use pierce_query::{penetration_scene_cast_with_exit_hits, ExitAwareCast, QueryConfig};
use pierce_scene::{HitEvent, SceneCast, SceneCastRequest};

use crate::nerf::NerfStack;
use crate::resource::{ResourceHit, ResourceKind};
use crate::rules::DepletionRules;

/// Where a segment started and where the resource ran out or the cast ended.
#[derive(Debug, Clone, PartialEq)]
pub struct CastInfo {
    /// Segment start.
    pub start: Point3,
    /// Segment end, reached only if the resource lasts.
    pub end: Point3,
    /// Unit direction from start to end.
    pub direction: Vec3,
    /// Resource at the start.
    pub start_value: f32,
    /// Where the segment stopped.
    pub stop: Point3,
    /// Resource left at the stop.
    pub stop_value: f32,
    /// Distance from start to stop.
    pub distance_to_stop: f32,
    /// Fraction of the segment covered at the stop.
    pub time_at_stop: f32,
}

/// Outcome of depleting a resource along one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult<R: ResourceKind> {
    /// Start and stop summary.
    pub info: CastInfo,
    /// Entrances and exits reached, in order.
    pub hits: Vec<ResourceHit<R>>,
    /// Index into `hits` of the hit that stopped the segment.
    pub stop_hit: Option<usize>,
}

impl<R: ResourceKind> SegmentResult<R> {
    fn new(start: Point3, end: Point3, initial: f32, capacity: usize) -> Self {
        Self {
            info: CastInfo {
                start,
                end,
                direction: safe_normal(&(end - start)),
                start_value: initial,
                stop: start,
                stop_value: initial.max(0.0),
                distance_to_stop: 0.0,
                time_at_stop: 0.0,
            },
            hits: Vec::with_capacity(capacity),
            stop_hit: None,
        }
    }

    /// The hit that stopped the segment, if any.
    pub fn stop_hit(&self) -> Option<&ResourceHit<R>> {
        self.stop_hit.and_then(|i| self.hits.get(i))
    }

    fn exhaust_at(&mut self, distance: f32) {
        let length = (self.info.end - self.info.start).norm();
        self.info.stop = self.info.start + self.info.direction * distance;
        self.info.stop_value = 0.0;
        self.info.distance_to_stop = distance;
        self.info.time_at_stop = if length > 0.0 { distance / length } else { 0.0 };
    }
}

/// Spend `rate * length` of `value`.
///
/// Returns the distance at which the value ran out if it does not cover `length`.
fn deplete(value: &mut f32, rate: f32, length: f32) -> Option<f32> {
    if rate > 0.0 {
        let reachable = (*value / rate).max(0.0);
        if reachable < length {
            *value = 0.0;
            return Some(reachable);
        }
    }
    *value -= rate * length;
    None
}

/// Walk the entrances and exits of `cast` from `start` to `end`, depleting `initial`.
///
/// Between hits the resource drops by the sum of `nerfs` per unit distance.
/// Entrances push `per_distance_nerf(hit)`, exits remove the matching entry.
/// Hits the cast started inside are reported but leave `nerfs` alone. The
/// walk ends where the resource runs out, at `cast.stop`, or at `end`.
/// A resource that is already spent skips the hits and only runs out again
/// if `nerfs` is non-zero.
pub fn deplete_along<R, F>(
    start: Point3,
    end: Point3,
    initial: f32,
    nerfs: &mut NerfStack,
    cast: ExitAwareCast,
    per_distance_nerf: F,
) -> SegmentResult<R>
where
    R: ResourceKind,
    F: Fn(&HitEvent) -> f32,
{
    let mut result = SegmentResult::new(start, end, initial, cast.hits.len());
    let length = (end - start).norm();
    let mut value = initial;
    let mut covered = 0.0f32;

    let hits = if initial > 0.0 { cast.hits } else { Vec::new() };
    for (index, hit) in hits.into_iter().enumerate() {
        let reached = hit.distance.max(covered);
        if let Some(reachable) = deplete(&mut value, nerfs.total(), reached - covered) {
            result.exhaust_at(covered + reachable);
            return result;
        }
        covered = reached;

        if hit.start_penetrating {
            log::debug!(
                "Cast started inside {:?}, leaving {} attenuation unchanged",
                hit.object,
                R::NAME
            );
            result.hits.push(ResourceHit::new(hit, value));
            continue;
        }

        if cast.stop == Some(index) {
            result.info.stop = hit.position;
            result.info.stop_value = value.max(0.0);
            result.info.distance_to_stop = hit.distance;
            result.info.time_at_stop = hit.time;
            result.hits.push(ResourceHit::new(hit, value));
            result.stop_hit = Some(result.hits.len() - 1);
            return result;
        }

        let nerf = per_distance_nerf(&hit.hit);
        if hit.is_exit {
            if !nerfs.remove_last_matching(nerf) {
                log::error!(
                    "Exit from {:?} has {} nerf {} with no matching entrance in {:?}",
                    hit.object,
                    R::NAME,
                    nerf,
                    nerfs.as_slice()
                );
            }
        } else {
            nerfs.push(nerf);
        }
        result.hits.push(ResourceHit::new(hit, value));
    }

    if let Some(reachable) = deplete(&mut value, nerfs.total(), length - covered) {
        result.exhaust_at(covered + reachable);
        return result;
    }

    result.info.stop = end;
    result.info.stop_value = value.max(0.0);
    result.info.distance_to_stop = length;
    result.info.time_at_stop = 1.0;
    result
}

/// Penetrating exit-aware cast of `request` followed by [`deplete_along`].
///
/// `is_stop` picks the entrance that ends the segment.
pub fn deplete_cast<R, S, N, P>(
    scene: &S,
    request: &SceneCastRequest,
    initial: f32,
    nerfs: &mut NerfStack,
    per_distance_nerf: N,
    is_stop: P,
    config: &QueryConfig,
) -> SegmentResult<R>
where
    R: ResourceKind,
    S: SceneCast + ?Sized,
    N: Fn(&HitEvent) -> f32,
    P: FnMut(&HitEvent) -> bool,
{
    let cast = penetration_scene_cast_with_exit_hits(scene, request, is_stop, config);
    deplete_along(request.start, request.end, initial, nerfs, cast, per_distance_nerf)
}

/// Deplete `initial` through `request` using `rules`, stopping at impenetrable hits.
pub fn penetrate<R, S, D>(
    scene: &S,
    request: &SceneCastRequest,
    initial: f32,
    nerfs: &mut NerfStack,
    rules: &D,
    config: &QueryConfig,
) -> SegmentResult<R>
where
    R: ResourceKind,
    S: SceneCast + ?Sized,
    D: DepletionRules + ?Sized,
{
    deplete_cast(
        scene,
        request,
        initial,
        nerfs,
        |hit| rules.per_distance_nerf(hit),
        |hit| rules.is_impenetrable(hit),
        config,
    )
}

/// [`penetrate`] with a fresh nerf stack seeded by `range_falloff`.
pub fn penetrate_with_range_falloff<R, S, D>(
    scene: &S,
    request: &SceneCastRequest,
    initial: f32,
    range_falloff: f32,
    rules: &D,
    config: &QueryConfig,
) -> SegmentResult<R>
where
    R: ResourceKind,
    S: SceneCast + ?Sized,
    D: DepletionRules + ?Sized,
{
    let mut nerfs = NerfStack::with_range_falloff(range_falloff);
    penetrate(scene, request, initial, &mut nerfs, rules, config)
}
