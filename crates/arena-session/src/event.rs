//! Lifecycle notifications.

use arena_core::SessionId;

/// Observable lifecycle notification, carrying the session it concerns.
///
/// Events are buffered while the engine mutates state and dispatched to
/// listeners only after the triggering operation completes, so a listener can
/// never observe (or re-enter) a half-applied transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The lobby opened
    Opened(SessionId),
    /// The lobby closed
    Closed(SessionId),
    /// The game started
    Started(SessionId),
    /// The game finished
    Finished(SessionId),
    /// The session completed one engine update
    Updated(SessionId),
}

impl SessionEvent {
    /// The session this event concerns.
    pub fn session(&self) -> &SessionId {
        match self {
            SessionEvent::Opened(id)
            | SessionEvent::Closed(id)
            | SessionEvent::Started(id)
            | SessionEvent::Finished(id)
            | SessionEvent::Updated(id) => id,
        }
    }
}

/// External consumer of lifecycle notifications.
///
/// Listeners run on the engine thread after each operation; they must not
/// block and cannot reach back into the registry (they do not hold it).
pub trait SessionListener {
    /// Called once per buffered event, in emission order.
    fn on_event(&mut self, event: &SessionEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_session_accessor() {
        let id = SessionId::from("ctf");
        let events = [
            SessionEvent::Opened(id.clone()),
            SessionEvent::Closed(id.clone()),
            SessionEvent::Started(id.clone()),
            SessionEvent::Finished(id.clone()),
            SessionEvent::Updated(id.clone()),
        ];
        for event in &events {
            assert_eq!(event.session(), &id);
        }
    }
}
