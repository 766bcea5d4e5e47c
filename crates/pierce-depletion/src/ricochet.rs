//! Chains of depletion segments joined by ricochets.

use pierce_math::{mirror_by_vector, safe_normal, Point3, Vec3};
use pierce_query::QueryConfig;
use pierce_scene::{SceneCast, SceneCastRequest};

use crate::nerf::NerfStack;
use crate::resource::{ResourceHit, ResourceKind};
use crate::rules::DepletionRules;
use crate::walk::{deplete_cast, SegmentResult};

/// Bounds on a ricochet chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLimits {
    /// Total distance shared by every segment. Must be positive.
    pub distance_cap: f32,
    /// Maximum number of ricochets, unlimited if `None`.
    pub ricochet_cap: Option<u32>,
    /// Maximum number of blocking entrances passed through, unlimited if `None`.
    pub penetration_cap: Option<u32>,
}

impl ChainLimits {
    /// Limits with only a distance cap.
    pub fn new(distance_cap: f32) -> Self {
        Self {
            distance_cap,
            ricochet_cap: None,
            penetration_cap: None,
        }
    }

    /// Cap the number of ricochets.
    pub fn with_ricochet_cap(mut self, cap: u32) -> Self {
        self.ricochet_cap = Some(cap);
        self
    }

    /// Cap the number of blocking entrances passed through.
    pub fn with_penetration_cap(mut self, cap: u32) -> Self {
        self.penetration_cap = Some(cap);
        self
    }
}

/// Start and stop of a whole chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainInfo {
    /// Chain start.
    pub start: Point3,
    /// Initial direction.
    pub direction: Vec3,
    /// Resource at the start.
    pub start_value: f32,
    /// Where the last segment stopped.
    pub stop: Point3,
    /// Resource left after the last segment and its ricochet, if any.
    pub stop_value: f32,
    /// Distance covered by all segments.
    pub distance_traveled: f32,
    /// `distance_traveled` as a fraction of the distance cap.
    pub time_at_stop: f32,
}

/// Outcome of a ricochet chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainResult<R: ResourceKind> {
    /// Chain summary.
    pub info: ChainInfo,
    /// One segment per cast, in order.
    pub segments: Vec<SegmentResult<R>>,
}

impl<R: ResourceKind> ChainResult<R> {
    /// Every hit of every segment, in order.
    pub fn hits(&self) -> impl Iterator<Item = &ResourceHit<R>> {
        self.segments.iter().flat_map(|segment| segment.hits.iter())
    }

    /// Number of ricochets taken.
    pub fn ricochet_count(&self) -> usize {
        self.hits().filter(|hit| hit.is_ricochet).count()
    }

    /// Hit that ended the chain, if it ended on one.
    pub fn terminating_hit(&self) -> Option<&ResourceHit<R>> {
        self.segments.last().and_then(|segment| segment.stop_hit())
    }
}

/// Deplete `initial` along a path that bounces off ricochetable surfaces.
///
/// Starts at `request.start` heading towards `request.end`. Each segment is
/// cast for the distance still left under `limits.distance_cap` and ends at
/// the first ricochetable or impenetrable entrance, or at the entrance that
/// exceeds `limits.penetration_cap`. A ricochet costs `ricochet_nerf` once
/// and the next segment leaves the hit along the mirrored direction. The
/// chain ends when the resource runs out, a segment ends without a
/// ricochet, the distance cap is reached or the ricochet cap is exceeded.
/// `nerfs` carries over between segments.
///
/// # Panics
///
/// Panics if `limits.distance_cap` is not positive.
pub fn ricochet_cast<R, S, D>(
    scene: &S,
    request: &SceneCastRequest,
    initial: f32,
    nerfs: &mut NerfStack,
    rules: &D,
    limits: &ChainLimits,
    config: &QueryConfig,
) -> ChainResult<R>
where
    R: ResourceKind,
    S: SceneCast + ?Sized,
    D: DepletionRules + ?Sized,
{
    assert!(
        limits.distance_cap > 0.0,
        "ricochet chain needs a positive distance cap, got {}",
        limits.distance_cap
    );

    let mut direction = request.direction();
    let mut info = ChainInfo {
        start: request.start,
        direction,
        start_value: initial,
        stop: request.start,
        stop_value: initial,
        distance_traveled: 0.0,
        time_at_stop: 0.0,
    };
    let mut segments = Vec::new();
    if direction == Vec3::zeros() {
        return ChainResult { info, segments };
    }

    let mut start = request.start;
    let mut value = initial;
    let mut traveled = 0.0f32;
    let mut penetrations = 0u32;
    let mut ricochet_number = 0u32;

    while limits.ricochet_cap.map_or(true, |cap| ricochet_number <= cap) {
        let mut segment_request = request.clone();
        segment_request.start = start;
        segment_request.end = start + direction * (limits.distance_cap - traveled);

        let mut segment: SegmentResult<R> = deplete_cast(
            scene,
            &segment_request,
            value,
            nerfs,
            |hit| rules.per_distance_nerf(hit),
            |hit| {
                if rules.is_ricochetable(hit) || rules.is_impenetrable(hit) {
                    return true;
                }
                if hit.blocking {
                    penetrations += 1;
                }
                limits.penetration_cap.is_some_and(|cap| penetrations > cap)
            },
            config,
        );

        let traveled_before = traveled;
        traveled += segment.info.distance_to_stop;
        value = segment.info.stop_value;
        for hit in &mut segment.hits {
            hit.ricochet_number = ricochet_number;
            hit.distance_traveled_before_this_cast = traveled_before;
        }
        info.stop = segment.info.stop;

        let ricochet = segment
            .stop_hit
            .filter(|&i| rules.is_ricochetable(&segment.hits[i].hit.hit));
        let Some(index) = ricochet else {
            segments.push(segment);
            break;
        };

        let hit = &mut segment.hits[index];
        hit.is_ricochet = true;
        value -= rules.ricochet_nerf(&hit.hit.hit);
        let normal = hit.hit.normal;
        let position = hit.hit.position;
        segments.push(segment);

        if value <= 0.0 {
            value = 0.0;
            break;
        }
        if traveled >= limits.distance_cap {
            break;
        }

        direction = safe_normal(&mirror_by_vector(&direction, &normal));
        start = position + direction * config.wall_avoidance_padding;
        ricochet_number += 1;
        log::trace!(
            "Ricochet {ricochet_number} at {position:?}, {} {value} left",
            R::NAME
        );
    }

    info.stop_value = value;
    info.distance_traveled = traveled;
    info.time_at_stop = traveled / limits.distance_cap;
    ChainResult { info, segments }
}

/// [`ricochet_cast`] with a fresh nerf stack seeded by `range_falloff`.
pub fn ricochet_cast_with_range_falloff<R, S, D>(
    scene: &S,
    request: &SceneCastRequest,
    initial: f32,
    range_falloff: f32,
    rules: &D,
    limits: &ChainLimits,
    config: &QueryConfig,
) -> ChainResult<R>
where
    R: ResourceKind,
    S: SceneCast + ?Sized,
    D: DepletionRules + ?Sized,
{
    let mut nerfs = NerfStack::with_range_falloff(range_falloff);
    ricochet_cast(scene, request, initial, &mut nerfs, rules, limits, config)
}
