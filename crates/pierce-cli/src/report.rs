//! JSON reports printed by the CLI.

use pierce::{
    ChainResult, ExitAwareCast, HitEvent, Point3, ResourceHit, ResourceKind, SceneWorld,
    SegmentResult, Vec3,
};
use serde::Serialize;

fn point(p: &Point3) -> [f32; 3] {
    [p.x, p.y, p.z]
}

fn vector(v: &Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Where a cast crossed a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitReport {
    pub object: String,
    pub material: Option<String>,
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub distance: f32,
    pub is_exit: bool,
    pub blocking: bool,
    pub start_penetrating: bool,
}

impl HitReport {
    fn new(world: &SceneWorld, hit: &HitEvent, is_exit: bool) -> Self {
        Self {
            object: world
                .object(hit.object)
                .map_or_else(|| format!("#{}", hit.object.0), |o| o.name.clone()),
            material: hit
                .material
                .and_then(|id| world.material_name(id))
                .map(str::to_owned),
            position: point(&hit.position),
            normal: vector(&hit.normal),
            distance: hit.distance,
            is_exit,
            blocking: hit.blocking,
            start_penetrating: hit.start_penetrating,
        }
    }
}

/// Entrances and exits of a cast without depletion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceReport {
    pub hits: Vec<HitReport>,
    pub stopped_by: Option<usize>,
}

impl TraceReport {
    pub fn new(world: &SceneWorld, cast: &ExitAwareCast) -> Self {
        Self {
            hits: cast
                .hits
                .iter()
                .map(|h| HitReport::new(world, &h.hit, h.is_exit))
                .collect(),
            stopped_by: cast.stop,
        }
    }
}

/// A hit with the resource left on reaching it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceHitReport {
    #[serde(flatten)]
    pub hit: HitReport,
    pub value: f32,
    pub total_distance: f32,
    pub ricochet_number: u32,
    pub is_ricochet: bool,
}

impl ResourceHitReport {
    fn new<R: ResourceKind>(world: &SceneWorld, hit: &ResourceHit<R>) -> Self {
        Self {
            hit: HitReport::new(world, &hit.hit.hit, hit.is_exit),
            value: hit.value,
            total_distance: hit.total_distance_traveled(),
            ricochet_number: hit.ricochet_number,
            is_ricochet: hit.is_ricochet,
        }
    }
}

/// One depletion segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub resource: &'static str,
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub stop: [f32; 3],
    pub start_value: f32,
    pub stop_value: f32,
    pub distance_to_stop: f32,
    pub hits: Vec<ResourceHitReport>,
    pub stopped_by: Option<usize>,
}

impl SegmentReport {
    pub fn new<R: ResourceKind>(world: &SceneWorld, segment: &SegmentResult<R>) -> Self {
        let info = &segment.info;
        Self {
            resource: R::NAME,
            start: point(&info.start),
            end: point(&info.end),
            stop: point(&info.stop),
            start_value: info.start_value,
            stop_value: info.stop_value,
            distance_to_stop: info.distance_to_stop,
            hits: segment
                .hits
                .iter()
                .map(|h| ResourceHitReport::new(world, h))
                .collect(),
            stopped_by: segment.stop_hit,
        }
    }
}

/// A whole ricochet chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainReport {
    pub resource: &'static str,
    pub start: [f32; 3],
    pub direction: [f32; 3],
    pub stop: [f32; 3],
    pub start_value: f32,
    pub stop_value: f32,
    pub distance_traveled: f32,
    pub ricochets: usize,
    pub segments: Vec<SegmentReport>,
}

impl ChainReport {
    pub fn new<R: ResourceKind>(world: &SceneWorld, chain: &ChainResult<R>) -> Self {
        let info = &chain.info;
        Self {
            resource: R::NAME,
            start: point(&info.start),
            direction: vector(&info.direction),
            stop: point(&info.stop),
            start_value: info.start_value,
            stop_value: info.stop_value,
            distance_traveled: info.distance_traveled,
            ricochets: chain.ricochet_count(),
            segments: chain
                .segments
                .iter()
                .map(|s| SegmentReport::new(world, s))
                .collect(),
        }
    }
}
