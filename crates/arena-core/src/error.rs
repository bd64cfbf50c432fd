//! Error types for the arena session engine.
//!
//! Every variant is an expected, user-facing outcome rather than a crash;
//! operations report them to their caller and never unwind across the API.

use thiserror::Error;

use crate::actor::ActorId;
use crate::phase::SessionPhase;
use crate::session::SessionId;

/// Main error type for arena operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation referenced a session id not present in the registry
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// Registration attempted with an id that is already registered
    #[error("session already registered: {0}")]
    DuplicateSession(SessionId),

    /// Open/close attempted while the current phase forbids it
    #[error("cannot {action} session {session} while {phase}")]
    IllegalTransition {
        /// Session the transition was attempted on
        session: SessionId,
        /// Attempted transition ("open" or "close")
        action: &'static str,
        /// Phase at the time of the attempt
        phase: SessionPhase,
    },

    /// Session reported itself not ready to open
    #[error("session {0} is not ready to open")]
    NotReady(SessionId),

    /// Force-finish attempted on a session not in the started phase
    #[error("session {0} has not started")]
    NotStarted(SessionId),

    /// Join attempted while the actor already occupies a registered session
    #[error("actor {actor} is already in session {session}")]
    AlreadyMember {
        /// Joining actor
        actor: ActorId,
        /// Session the actor currently occupies
        session: SessionId,
    },

    /// A session-specific veto hook refused a join or quit
    #[error("session {session} rejected the request")]
    MembershipRejected {
        /// Session whose hook refused
        session: SessionId,
    },

    /// Join attempted while the lobby phase does not admit participants
    #[error("session {session} is not joinable while {phase}")]
    LobbyUnavailable {
        /// Session the actor tried to join
        session: SessionId,
        /// Phase at the time of the attempt
        phase: SessionPhase,
    },

    /// Quit attempted while the actor has no occupancy entry
    #[error("actor is not in any session")]
    NoActiveMembership,

    /// A session declared an empty transfer map (configuration defect)
    #[error("transfer map for session {0} is empty")]
    EmptyTransferMap(SessionId),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
