//! Collision channels and per-channel response tables.
//!
//! Every object in a scene has an object-type channel and a table saying how
//! it responds to queries on each channel. Every query has a channel and a
//! table saying how it responds to each object type. The response used for a
//! hit is the weaker of the two.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

/// Number of collision channels a response table covers.
pub const CHANNEL_COUNT: usize = 32;

/// A collision channel: both an object type and a query channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Channel(u8);

impl Channel {
    /// Static level geometry.
    pub const WORLD_STATIC: Channel = Channel(0);
    /// Movable level geometry.
    pub const WORLD_DYNAMIC: Channel = Channel(1);
    /// Characters.
    pub const PAWN: Channel = Channel(2);
    /// Line-of-sight queries.
    pub const VISIBILITY: Channel = Channel(3);
    /// Camera queries.
    pub const CAMERA: Channel = Channel(4);
    /// Physics-simulated bodies.
    pub const PHYSICS_BODY: Channel = Channel(5);
    /// Projectile and hitscan queries.
    pub const PROJECTILE: Channel = Channel(6);

    /// Create a channel from its index.
    pub fn new(index: u8) -> Result<Self> {
        if (index as usize) < CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(SceneError::InvalidChannel(index))
        }
    }

    /// Index of this channel in a response table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Channel {
    type Error = SceneError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> u8 {
        channel.0
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::WORLD_STATIC
    }
}

/// How a body and a query react to each other.
///
/// Ordered weakest to strongest so the combined response is a `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionResponse {
    /// No hit is reported.
    Ignore,
    /// Hit is reported but does not stop the cast.
    Overlap,
    /// Hit is reported and stops an ordinary cast.
    #[default]
    Block,
}

/// One response per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseContainer {
    responses: [CollisionResponse; CHANNEL_COUNT],
}

impl ResponseContainer {
    /// A table with the same response on every channel.
    pub fn all(response: CollisionResponse) -> Self {
        Self {
            responses: [response; CHANNEL_COUNT],
        }
    }

    /// Response on `channel`.
    pub fn get(&self, channel: Channel) -> CollisionResponse {
        self.responses[channel.index()]
    }

    /// Set the response on `channel`.
    pub fn set(&mut self, channel: Channel, response: CollisionResponse) {
        self.responses[channel.index()] = response;
    }

    /// Set the response on every channel.
    pub fn set_all(&mut self, response: CollisionResponse) {
        self.responses = [response; CHANNEL_COUNT];
    }

    /// Replace every occurrence of `from` with `to`.
    pub fn replace(&mut self, from: CollisionResponse, to: CollisionResponse) {
        for response in self.responses.iter_mut().filter(|r| **r == from) {
            *response = to;
        }
    }

    /// Builder form of [`ResponseContainer::set`].
    pub fn with(mut self, channel: Channel, response: CollisionResponse) -> Self {
        self.set(channel, response);
        self
    }
}

impl Default for ResponseContainer {
    fn default() -> Self {
        Self::all(CollisionResponse::Block)
    }
}

/// Collision setup of one scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBody {
    /// Channel this object reports as its type.
    pub object_type: Channel,
    /// How this object responds to queries on each channel.
    pub responses: ResponseContainer,
    /// Objects with queries disabled never produce hits.
    pub query_enabled: bool,
    /// Radius of the sphere bounding the object around its origin.
    pub bounding_radius: f32,
}

impl CollisionBody {
    /// A static body that blocks every channel.
    pub fn new(bounding_radius: f32) -> Self {
        Self {
            object_type: Channel::WORLD_STATIC,
            responses: ResponseContainer::default(),
            query_enabled: true,
            bounding_radius,
        }
    }

    /// Response of a query on `channel` with per-object-type `query_responses` against this body.
    pub fn combined_response(
        &self,
        channel: Channel,
        query_responses: &ResponseContainer,
    ) -> CollisionResponse {
        if !self.query_enabled {
            return CollisionResponse::Ignore;
        }
        query_responses
            .get(self.object_type)
            .min(self.responses.get(channel))
    }
}
