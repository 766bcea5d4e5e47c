//! Error types for scene construction.

use thiserror::Error;

use crate::hit::ObjectId;

/// Errors that can occur while building or describing a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Material name not registered with the scene.
    #[error("Material not found: {0}")]
    UnknownMaterial(String),

    /// Object id does not belong to this scene.
    #[error("Object not found: {0:?}")]
    UnknownObject(ObjectId),

    /// Shape parameters cannot produce a collision shape.
    #[error("Invalid shape for {name}: {reason}")]
    InvalidShape {
        /// Object name.
        name: String,
        /// Reason for failure.
        reason: String,
    },

    /// Collision channel index out of range.
    #[error("Collision channel {0} out of range")]
    InvalidChannel(u8),

    /// Scene description could not be parsed.
    #[error("Failed to parse scene description: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
