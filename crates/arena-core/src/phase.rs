//! Session lifecycle phases.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a session.
///
/// The cycle is `Closed → Open → Started → Finished → Closed`. `Closed` is
/// both the initial phase and a re-enterable rest state; there is no terminal
/// phase. Each phase carries four legality guards consulted by the lifecycle
/// engine; nothing outside the engine's transition points assigns a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Lobby is closed; nothing is running
    Closed,
    /// Lobby is open and collecting participants
    Open,
    /// The timed activity is running
    Started,
    /// The activity finished; outcome is observable until close
    Finished,
}

impl SessionPhase {
    /// Whether the lobby may be opened from this phase.
    pub fn can_open(self) -> bool {
        matches!(self, SessionPhase::Closed | SessionPhase::Finished)
    }

    /// Whether the activity may start from this phase.
    pub fn can_start(self) -> bool {
        matches!(self, SessionPhase::Open)
    }

    /// Whether the activity may finish from this phase.
    pub fn can_finish(self) -> bool {
        matches!(self, SessionPhase::Started)
    }

    /// Whether the lobby may be closed from this phase.
    pub fn can_close(self) -> bool {
        matches!(self, SessionPhase::Open | SessionPhase::Finished)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Closed => "closed",
            SessionPhase::Open => "open",
            SessionPhase::Started => "started",
            SessionPhase::Finished => "finished",
        };
        write!(f, "{name}")
    }
}
