//! The scene cast primitive.

use pierce_math::{safe_normal, Point3, Rotation, Vec3};

use crate::channel::{Channel, CollisionBody, ResponseContainer};
use crate::hit::{HitEvent, ObjectId};
use crate::shape::CastShape;

/// Filtering options for a scene cast.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Drop overlap-only hits.
    pub ignore_touches: bool,
    /// Drop blocking hits.
    pub ignore_blocks: bool,
    /// Objects that never produce hits.
    pub ignored: Vec<ObjectId>,
    /// Report objects the cast starts inside of.
    pub find_initial_overlaps: bool,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            ignore_touches: false,
            ignore_blocks: false,
            ignored: Vec::new(),
            find_initial_overlaps: true,
        }
    }
}

impl QueryParams {
    /// True if `object` is in the ignore list.
    pub fn is_ignored(&self, object: ObjectId) -> bool {
        self.ignored.contains(&object)
    }
}

/// A directed cast from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCastRequest {
    /// Cast start.
    pub start: Point3,
    /// Cast end.
    pub end: Point3,
    /// Shape swept along the cast.
    pub shape: CastShape,
    /// Orientation of the swept shape.
    pub rotation: Rotation,
    /// Query channel.
    pub channel: Channel,
    /// Filtering options.
    pub params: QueryParams,
    /// How this query responds to each object type.
    pub responses: ResponseContainer,
}

impl SceneCastRequest {
    /// A ray from `start` to `end` on `channel` with default responses.
    pub fn new(start: Point3, end: Point3, channel: Channel) -> Self {
        Self {
            start,
            end,
            shape: CastShape::Line,
            rotation: Rotation::identity(),
            channel,
            params: QueryParams::default(),
            responses: ResponseContainer::default(),
        }
    }

    /// Sweep `shape` instead of a ray.
    pub fn with_shape(mut self, shape: CastShape, rotation: Rotation) -> Self {
        self.shape = shape;
        self.rotation = rotation;
        self
    }

    /// Replace the filtering options.
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the per-object-type responses.
    pub fn with_responses(mut self, responses: ResponseContainer) -> Self {
        self.responses = responses;
        self
    }

    /// Unit direction from start to end, zero for a degenerate cast.
    pub fn direction(&self) -> Vec3 {
        safe_normal(&(self.end - self.start))
    }

    /// Distance from start to end.
    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }
}

/// Something a directed cast can be run against.
pub trait SceneCast {
    /// Cast `request` into the scene.
    ///
    /// Returns hits sorted by increasing distance. Hits past the first
    /// blocking hit are not reported, so a request whose responses contain
    /// no `Block` reports every crossing along the full segment.
    fn cast_multi(&self, request: &SceneCastRequest) -> Vec<HitEvent>;

    /// Collision setup of `object`, if it belongs to this scene.
    fn body(&self, object: ObjectId) -> Option<&CollisionBody>;
}
