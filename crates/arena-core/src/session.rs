//! Session identity, transfer routing and operator projections.

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::geometry::Position;
use crate::phase::SessionPhase;

/// Operator-facing identifier for a registered session.
///
/// Sessions are addressed by name in operator commands, so this is a cheap
/// string newtype rather than a random id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SessionId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rally-point route: participants gathered at `anchor` are sent to
/// `destination` when the activity starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferPoint {
    /// Rally point inside the zone
    pub anchor: Position,
    /// Relocation target on start
    pub destination: Position,
}

/// Ordered set of rally-point routes for a session.
///
/// The engine treats this as read-only. Faction indices produced by the zone
/// scan refer to positions in this ordering. A transfer map must be non-empty;
/// an empty one is rejected at registration time as a configuration defect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferMap(Vec<TransferPoint>);

impl TransferMap {
    /// Create an empty transfer map.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a route from `anchor` to `destination`.
    pub fn route(mut self, anchor: Position, destination: Position) -> Self {
        self.0.push(TransferPoint {
            anchor,
            destination,
        });
        self
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no routes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The route at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&TransferPoint> {
        self.0.get(index)
    }

    /// Iterate over all routes in order.
    pub fn iter(&self) -> impl Iterator<Item = &TransferPoint> {
        self.0.iter()
    }

    /// Index of the anchor nearest to `point` by squared Euclidean distance.
    ///
    /// Ties go to the earliest anchor in route order. Returns `None` only for
    /// an empty map.
    pub fn nearest_anchor(&self, point: &Position) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, route) in self.0.iter().enumerate() {
            let distance = route.anchor.distance_squared(point);
            if best.map_or(true, |(_, min)| distance < min) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Read-only projection of one session for operator tooling (`info`).
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Session identifier
    pub id: SessionId,
    /// Display name
    pub display: String,
    /// Current lifecycle phase
    pub phase: SessionPhase,
    /// Ticks elapsed since the lobby last opened
    pub lobby_elapsed: u64,
    /// Ticks elapsed since the activity started
    pub game_elapsed: u64,
    /// Current zone occupants, in scan order
    pub members: Vec<ActorId>,
    /// Session-specific extra info lines
    pub extra: Vec<String>,
}
