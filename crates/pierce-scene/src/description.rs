//! Serializable scene descriptions.
//!
//! A description is a flat list of primitive objects with placement,
//! material and collision setup. It is the JSON format the command line
//! tool loads.

use parry3d::shape::SharedShape;
use pierce_math::{rotation_from_euler_degrees, Isometry3, Vec3};
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, CollisionResponse};
use crate::error::{Result, SceneError};
use crate::world::SceneWorld;

/// Primitive collision geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDescription {
    /// Box with half extents.
    Cuboid {
        /// Half extents along the local axes.
        half_extents: [f32; 3],
    },
    /// Sphere.
    Ball {
        /// Radius.
        radius: f32,
    },
    /// Capsule along the local Y axis.
    Capsule {
        /// Half length of the inner segment.
        half_height: f32,
        /// Radius.
        radius: f32,
    },
    /// Cylinder along the local Y axis.
    Cylinder {
        /// Half height.
        half_height: f32,
        /// Radius.
        radius: f32,
    },
}

impl ShapeDescription {
    fn to_shared_shape(&self, name: &str) -> Result<SharedShape> {
        let invalid = |reason: &str| SceneError::InvalidShape {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        match *self {
            ShapeDescription::Cuboid { half_extents } => {
                if half_extents.iter().any(|e| *e <= 0.0) {
                    return Err(invalid("half extents must be positive"));
                }
                Ok(SharedShape::cuboid(
                    half_extents[0],
                    half_extents[1],
                    half_extents[2],
                ))
            }
            ShapeDescription::Ball { radius } => {
                if radius <= 0.0 {
                    return Err(invalid("radius must be positive"));
                }
                Ok(SharedShape::ball(radius))
            }
            ShapeDescription::Capsule {
                half_height,
                radius,
            } => {
                if radius <= 0.0 || half_height < 0.0 {
                    return Err(invalid("capsule dimensions must be positive"));
                }
                Ok(SharedShape::capsule_y(half_height, radius))
            }
            ShapeDescription::Cylinder {
                half_height,
                radius,
            } => {
                if radius <= 0.0 || half_height <= 0.0 {
                    return Err(invalid("cylinder dimensions must be positive"));
                }
                Ok(SharedShape::cylinder(half_height, radius))
            }
        }
    }
}

/// Response override for one query channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelResponse {
    /// Query channel.
    pub channel: Channel,
    /// Response on that channel.
    pub response: CollisionResponse,
}

fn default_true() -> bool {
    true
}

/// One object in a scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Object name.
    pub name: String,
    /// Collision geometry.
    pub shape: ShapeDescription,
    /// World position.
    #[serde(default)]
    pub translation: [f32; 3],
    /// Roll, pitch and yaw in degrees.
    #[serde(default)]
    pub rotation_deg: [f32; 3],
    /// Surface material name.
    #[serde(default)]
    pub material: Option<String>,
    /// Object-type channel.
    #[serde(default)]
    pub object_type: Channel,
    /// Response on channels without an override.
    #[serde(default)]
    pub default_response: CollisionResponse,
    /// Per-channel response overrides.
    #[serde(default)]
    pub responses: Vec<ChannelResponse>,
    /// Objects with queries disabled never produce hits.
    #[serde(default = "default_true")]
    pub query_enabled: bool,
}

/// A whole scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Objects in the scene.
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Parse a description from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a queryable scene from this description.
    ///
    /// Materials are registered in order of first use.
    pub fn build(&self) -> Result<SceneWorld> {
        let mut world = SceneWorld::new();
        for desc in &self.objects {
            let shape = desc.shape.to_shared_shape(&desc.name)?;
            let [roll, pitch, yaw] = desc.rotation_deg;
            let pose = Isometry3::from_parts(
                Vec3::from(desc.translation).into(),
                rotation_from_euler_degrees(roll, pitch, yaw),
            );
            let id = world.add_object(desc.name.clone(), shape, pose);
            if let Some(material) = &desc.material {
                world.add_material(material);
                world.set_material(id, material)?;
            }
            let object = world.object_mut(id).ok_or(SceneError::UnknownObject(id))?;
            object.body.object_type = desc.object_type;
            object.body.query_enabled = desc.query_enabled;
            object.body.responses.set_all(desc.default_response);
            for o in &desc.responses {
                object.body.responses.set(o.channel, o.response);
            }
        }
        Ok(world)
    }
}
