//! Geometry types for world coordinates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a world, supplied by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(Uuid);

impl WorldId {
    /// Create a new random world ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for WorldId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in a world, with the facing an actor placed there would have.
///
/// Facing (yaw/pitch) plays no part in distance or containment tests; it only
/// matters when a position is used as a relocation target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// World this position belongs to
    pub world: WorldId,
    /// X coordinate
    pub x: f64,
    /// Y coordinate (vertical axis)
    pub y: f64,
    /// Z coordinate
    pub z: f64,
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees
    pub pitch: f32,
}

impl Position {
    /// Create a new position with neutral facing.
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// This position shifted by the given deltas, same world and facing.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
            ..*self
        }
    }

    /// This position with the given facing.
    pub fn with_facing(&self, yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch, ..*self }
    }

    /// This position carrying the facing of `other`.
    ///
    /// Used when relocating an actor somewhere without spinning it around.
    pub fn facing_from(&self, other: &Position) -> Self {
        self.with_facing(other.yaw, other.pitch)
    }

    /// Squared Euclidean distance to another position.
    ///
    /// World membership is not checked; callers compare positions within one
    /// world.
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Whether this position lies in the same world as another.
    pub fn same_world(&self, other: &Position) -> bool {
        self.world == other.world
    }
}
