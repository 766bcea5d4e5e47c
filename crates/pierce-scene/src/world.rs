//! Scene of static collision objects queried with parry3d.

use parry3d::query::{self, Ray, ShapeCastOptions, ShapeCastStatus};
use parry3d::shape::SharedShape;
use pierce_math::{Isometry3, Point3, Vec3};

use crate::channel::{CollisionBody, CollisionResponse};
use crate::error::{Result, SceneError};
use crate::hit::{HitEvent, MaterialId, ObjectId};
use crate::query::{SceneCast, SceneCastRequest};

/// A collision object placed in a [`SceneWorld`].
#[derive(Clone)]
pub struct SceneObject {
    /// Identity reported in hits.
    pub id: ObjectId,
    /// Human readable name.
    pub name: String,
    /// Collision geometry in local space.
    pub shape: SharedShape,
    /// World placement of the geometry.
    pub pose: Isometry3,
    /// Channels and responses.
    pub body: CollisionBody,
    /// Surface material.
    pub material: Option<MaterialId>,
}

/// Geometry of one candidate crossing before response filtering.
struct RawHit {
    time: f32,
    impact_point: Point3,
    normal: Vec3,
    start_penetrating: bool,
}

/// A set of static objects that answers [`SceneCast`] queries.
#[derive(Clone, Default)]
pub struct SceneWorld {
    objects: Vec<SceneObject>,
    materials: Vec<String>,
}

impl SceneWorld {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material by name, returning the existing id if already known.
    pub fn add_material(&mut self, name: &str) -> MaterialId {
        if let Some(id) = self.material_id(name) {
            return id;
        }
        self.materials.push(name.to_string());
        MaterialId((self.materials.len() - 1) as u32)
    }

    /// Look up a material by name.
    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|m| m == name)
            .map(|i| MaterialId(i as u32))
    }

    /// Name of a registered material.
    pub fn material_name(&self, id: MaterialId) -> Option<&str> {
        self.materials.get(id.0 as usize).map(String::as_str)
    }

    /// Place a static, all-blocking object in the scene.
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        shape: SharedShape,
        pose: Isometry3,
    ) -> ObjectId {
        let sphere = shape.compute_local_bounding_sphere();
        let bounding_radius = sphere.center().coords.norm() + sphere.radius();
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            shape,
            pose,
            body: CollisionBody::new(bounding_radius),
            material: None,
        });
        id
    }

    /// Assign a registered material to an object.
    pub fn set_material(&mut self, object: ObjectId, material: &str) -> Result<()> {
        let material = self
            .material_id(material)
            .ok_or_else(|| SceneError::UnknownMaterial(material.to_string()))?;
        let object = self
            .object_mut(object)
            .ok_or(SceneError::UnknownObject(object))?;
        object.material = Some(material);
        Ok(())
    }

    /// Object by id.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    /// Mutable object by id.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0 as usize)
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn cast_object(
        &self,
        object: &SceneObject,
        request: &SceneCastRequest,
        sweep: Option<&SharedShape>,
        direction: &Vec3,
        length: f32,
    ) -> Option<RawHit> {
        match sweep {
            None => {
                let ray = Ray::new(request.start, *direction);
                let hit = object
                    .shape
                    .cast_ray_and_get_normal(&object.pose, &ray, length, true)?;
                let start_penetrating = hit.time_of_impact <= 0.0
                    && object.shape.contains_point(&object.pose, &request.start);
                Some(RawHit {
                    time: hit.time_of_impact / length,
                    impact_point: ray.point_at(hit.time_of_impact),
                    normal: if start_penetrating { -direction } else { hit.normal },
                    start_penetrating,
                })
            }
            Some(shape) => {
                let cast_pose = Isometry3::from_parts(request.start.coords.into(), request.rotation);
                let velocity = direction * length;
                let options = ShapeCastOptions {
                    max_time_of_impact: 1.0,
                    target_distance: 0.0,
                    stop_at_penetration: true,
                    compute_impact_geometry_on_penetration: true,
                };
                let result = query::cast_shapes(
                    &cast_pose,
                    &velocity,
                    &**shape,
                    &object.pose,
                    &Vec3::zeros(),
                    &*object.shape,
                    options,
                );
                match result {
                    Ok(Some(hit)) => {
                        let start_penetrating = matches!(
                            hit.status,
                            ShapeCastStatus::PenetratingOrWithinTargetDist
                        );
                        Some(RawHit {
                            time: hit.time_of_impact,
                            impact_point: object.pose * hit.witness2,
                            normal: if start_penetrating {
                                -direction
                            } else {
                                object.pose.rotation * hit.normal2.into_inner()
                            },
                            start_penetrating,
                        })
                    }
                    Ok(None) => None,
                    Err(_) => {
                        log::warn!(
                            "Shape cast against {} is not supported, skipping",
                            object.name
                        );
                        None
                    }
                }
            }
        }
    }
}

impl SceneCast for SceneWorld {
    fn cast_multi(&self, request: &SceneCastRequest) -> Vec<HitEvent> {
        let length = request.length();
        if length <= f32::EPSILON {
            return Vec::new();
        }
        let direction = request.direction();
        let sweep = request.shape.to_shared_shape();

        let mut hits: Vec<HitEvent> = self
            .objects
            .iter()
            .filter(|object| !request.params.is_ignored(object.id))
            .filter_map(|object| {
                let response = object
                    .body
                    .combined_response(request.channel, &request.responses);
                let blocking = match response {
                    CollisionResponse::Ignore => return None,
                    CollisionResponse::Overlap if request.params.ignore_touches => return None,
                    CollisionResponse::Block if request.params.ignore_blocks => return None,
                    CollisionResponse::Overlap => false,
                    CollisionResponse::Block => true,
                };
                let raw = self.cast_object(object, request, sweep.as_ref(), &direction, length)?;
                if raw.start_penetrating && !request.params.find_initial_overlaps {
                    return None;
                }
                let distance = raw.time * length;
                Some(HitEvent {
                    position: request.start + direction * distance,
                    impact_point: raw.impact_point,
                    normal: raw.normal,
                    distance,
                    time: raw.time,
                    trace_start: request.start,
                    trace_end: request.end,
                    object: object.id,
                    material: object.material,
                    start_penetrating: raw.start_penetrating,
                    blocking,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        if let Some(first_block) = hits.iter().position(|h| h.blocking) {
            hits.truncate(first_block + 1);
        }
        hits
    }

    fn body(&self, object: ObjectId) -> Option<&CollisionBody> {
        self.object(object).map(|o| &o.body)
    }
}
