//! The exclusive actor→session occupancy map.

use std::collections::HashMap;

use arena_core::{ActorId, SessionId};

/// Registry-level map recording which session each actor currently occupies.
///
/// This is the single arbiter of session membership: at most one entry per
/// actor, added on successful join and removed on quit, kick or close.
/// Sessions must never mutate their own member lists without going through
/// operations that keep this map in step.
#[derive(Debug, Default)]
pub struct Occupancy {
    entries: HashMap<ActorId, SessionId>,
}

impl Occupancy {
    /// Create an empty occupancy map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session an actor currently occupies, if any.
    pub fn session_of(&self, actor: &ActorId) -> Option<&SessionId> {
        self.entries.get(actor)
    }

    /// Whether the actor's entry names exactly this session.
    pub fn is_assigned_to(&self, actor: &ActorId, session: &SessionId) -> bool {
        self.entries.get(actor) == Some(session)
    }

    /// Record an actor as occupying a session, replacing any previous entry.
    pub fn insert(&mut self, actor: ActorId, session: SessionId) {
        self.entries.insert(actor, session);
    }

    /// Remove an actor's entry, returning the session it named.
    pub fn remove(&mut self, actor: &ActorId) -> Option<SessionId> {
        self.entries.remove(actor)
    }

    /// Remove every entry naming the given session; returns how many were
    /// evicted.
    pub fn purge_session(&mut self, session: &SessionId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, occupied| occupied != session);
        before - self.entries.len()
    }

    /// Number of occupying actors across all sessions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no actor occupies any session.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut occupancy = Occupancy::new();
        let actor = ActorId::new();
        let session = SessionId::from("ctf");

        assert_eq!(occupancy.session_of(&actor), None);
        occupancy.insert(actor, session.clone());
        assert_eq!(occupancy.session_of(&actor), Some(&session));
        assert!(occupancy.is_assigned_to(&actor, &session));
        assert!(!occupancy.is_assigned_to(&actor, &SessionId::from("other")));
    }

    #[test]
    fn test_one_entry_per_actor() {
        let mut occupancy = Occupancy::new();
        let actor = ActorId::new();
        occupancy.insert(actor, SessionId::from("a"));
        occupancy.insert(actor, SessionId::from("b"));

        assert_eq!(occupancy.len(), 1);
        assert_eq!(occupancy.session_of(&actor), Some(&SessionId::from("b")));
    }

    #[test]
    fn test_remove_returns_session() {
        let mut occupancy = Occupancy::new();
        let actor = ActorId::new();
        occupancy.insert(actor, SessionId::from("a"));

        assert_eq!(occupancy.remove(&actor), Some(SessionId::from("a")));
        assert_eq!(occupancy.remove(&actor), None);
        assert!(occupancy.is_empty());
    }

    #[test]
    fn test_purge_session() {
        let mut occupancy = Occupancy::new();
        let a = ActorId::new();
        let b = ActorId::new();
        let c = ActorId::new();
        occupancy.insert(a, SessionId::from("ctf"));
        occupancy.insert(b, SessionId::from("ctf"));
        occupancy.insert(c, SessionId::from("race"));

        assert_eq!(occupancy.purge_session(&SessionId::from("ctf")), 2);
        assert_eq!(occupancy.len(), 1);
        assert_eq!(occupancy.session_of(&c), Some(&SessionId::from("race")));
    }
}
