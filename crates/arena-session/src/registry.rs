//! The session registry: registered sessions, their lifecycle state and the
//! exclusive occupancy map.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use arena_core::{
    ActorId, EngineConfig, Error, Result, SessionId, SessionPhase, SessionSnapshot,
};

use crate::engine;
use crate::event::{SessionEvent, SessionListener};
use crate::host::Host;
use crate::lobby::GameLobby;
use crate::occupancy::Occupancy;
use crate::scheduler::{ManualScheduler, TickScheduler};
use crate::state::SessionState;

/// Owner of every registered session and the sole authority over membership.
///
/// Sessions are stateless descriptors; their lifecycle state lives in a side
/// table keyed by session id. Every operation is a bounded synchronous
/// computation and expects the host's single-threaded invocation discipline;
/// there is no internal locking.
pub struct SessionRegistry<H: Host, S: TickScheduler = ManualScheduler> {
    config: EngineConfig,
    host: H,
    scheduler: S,
    sessions: HashMap<SessionId, Box<dyn GameLobby>>,
    states: HashMap<SessionId, SessionState>,
    occupancy: Occupancy,
    listeners: Vec<Box<dyn SessionListener>>,
    events: Vec<SessionEvent>,
}

impl<H: Host> SessionRegistry<H, ManualScheduler> {
    /// Create a registry with a manual scheduler.
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self::with_scheduler(host, ManualScheduler::new(), config)
    }

    /// Advance the scheduler by `base_ticks` and run every session tick that
    /// came due. This is the main entry point for hosts (and the runner)
    /// driving the registry off a wall clock.
    pub fn advance(&mut self, base_ticks: u64) {
        for id in self.scheduler.advance(base_ticks) {
            if let Err(error) = self.tick(&id) {
                // Cancellation on unregister should make this unreachable.
                warn!("scheduled tick failed: id={id}, error={error}");
            }
        }
    }
}

impl<H: Host, S: TickScheduler> SessionRegistry<H, S> {
    /// Create a registry with an explicit scheduler.
    pub fn with_scheduler(host: H, scheduler: S, config: EngineConfig) -> Self {
        Self {
            config,
            host,
            scheduler,
            sessions: HashMap::new(),
            states: HashMap::new(),
            occupancy: Occupancy::new(),
            listeners: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Register a session and schedule its periodic tick.
    ///
    /// Rejects duplicate ids and empty transfer maps; the latter is a
    /// configuration defect surfaced here rather than at start time.
    pub fn register(&mut self, lobby: Box<dyn GameLobby>) -> Result<()> {
        let id = lobby.id();
        if self.sessions.contains_key(&id) {
            warn!("session already registered: id={id}");
            return Err(Error::DuplicateSession(id));
        }
        if lobby.transfer().is_empty() {
            warn!("session declared an empty transfer map: id={id}");
            return Err(Error::EmptyTransferMap(id));
        }

        let cadence = lobby.cadence().unwrap_or(self.config.tick_interval);
        let mut state = SessionState::new();
        state.task = Some(self.scheduler.schedule(id.clone(), cadence));
        self.states.insert(id.clone(), state);
        self.sessions.insert(id.clone(), lobby);
        info!("session registered: id={id}, cadence={cadence}");
        Ok(())
    }

    /// Unregister a session: cancel its tick, evict its occupants, drop its
    /// state.
    pub fn unregister(&mut self, id: &SessionId) -> Result<()> {
        if !self.sessions.contains_key(id) {
            warn!("unregister of unknown session: id={id}");
            return Err(Error::UnknownSession(id.clone()));
        }
        // Cancel before teardown so no tick can fire against removed state.
        if let Some(task) = self.states.get(id).and_then(|state| state.task) {
            self.scheduler.cancel(task);
        }
        let evicted = self.occupancy.purge_session(id);
        self.states.remove(id);
        self.sessions.remove(id);
        info!("session unregistered: id={id}, evicted={evicted}");
        Ok(())
    }

    /// Open a session's lobby.
    pub fn try_open(&mut self, id: &SessionId) -> Result<()> {
        let (lobby, state) = Self::resolve(&mut self.sessions, &mut self.states, id)?;
        let result = engine::open(lobby.as_mut(), state, &mut self.events);
        self.dispatch_events();
        result
    }

    /// Close a session's lobby.
    pub fn try_close(&mut self, id: &SessionId) -> Result<()> {
        let (lobby, state) = Self::resolve(&mut self.sessions, &mut self.states, id)?;
        let result = engine::close(lobby.as_mut(), state, &mut self.occupancy, &mut self.events);
        self.dispatch_events();
        result
    }

    /// Force-finish a running session, returning its members to the zone
    /// center. Only legal while the session is started.
    pub fn try_force_finish(&mut self, id: &SessionId) -> Result<()> {
        let (lobby, state) = Self::resolve(&mut self.sessions, &mut self.states, id)?;
        if state.phase() != SessionPhase::Started {
            return Err(Error::NotStarted(id.clone()));
        }
        engine::finish(lobby.as_mut(), state, &mut self.host, &mut self.events);
        self.dispatch_events();
        Ok(())
    }

    /// Join an actor to a session's lobby.
    ///
    /// Fails while the actor occupies any still-registered session; a stale
    /// entry naming an unregistered session is ignored and overwritten. On
    /// acceptance the actor is recorded in occupancy and relocated to the
    /// zone center.
    pub fn try_join(&mut self, actor: ActorId, id: &SessionId) -> Result<()> {
        if let Some(current) = self.occupancy.session_of(&actor) {
            if self.sessions.contains_key(current) {
                return Err(Error::AlreadyMember {
                    actor,
                    session: current.clone(),
                });
            }
        }
        let (lobby, state) = Self::resolve(&mut self.sessions, &mut self.states, id)?;
        match state.phase() {
            SessionPhase::Closed | SessionPhase::Started => Err(Error::LobbyUnavailable {
                session: id.clone(),
                phase: state.phase(),
            }),
            SessionPhase::Open | SessionPhase::Finished => {
                if !lobby.on_actor_join(actor) {
                    return Err(Error::MembershipRejected {
                        session: id.clone(),
                    });
                }
                self.occupancy.insert(actor, id.clone());
                self.host.teleport(actor, lobby.zone().center);
                debug!("actor joined: actor={actor}, id={id}");
                Ok(())
            }
        }
    }

    /// Quit an actor from whatever session it occupies.
    pub fn try_quit(&mut self, actor: ActorId) -> Result<()> {
        let Some(current) = self.occupancy.session_of(&actor).cloned() else {
            return Err(Error::NoActiveMembership);
        };
        let Some(lobby) = self.sessions.get_mut(&current) else {
            return Err(Error::UnknownSession(current));
        };
        if !lobby.on_actor_quit(actor) {
            return Err(Error::MembershipRejected { session: current });
        }
        self.occupancy.remove(&actor);
        debug!("actor quit: actor={actor}, id={current}");
        Ok(())
    }

    /// Unconditionally remove an actor from a session's membership and from
    /// occupancy. Used by death and disconnect handling; never vetoed.
    pub fn kick(&mut self, id: &SessionId, actor: ActorId) {
        let Some(state) = self.states.get_mut(id) else {
            warn!("kick on unknown session: id={id}");
            return;
        };
        state.remove_member(&actor);
        self.occupancy.remove(&actor);
        debug!("actor kicked: actor={actor}, id={id}");
    }

    /// Report an actor's death to its current session; the session decides
    /// whether the death evicts it.
    pub fn actor_death(&mut self, actor: ActorId) {
        let Some(id) = self.occupancy.session_of(&actor).cloned() else {
            return;
        };
        let Some(lobby) = self.sessions.get_mut(&id) else {
            return;
        };
        if lobby.on_actor_death(actor) {
            self.kick(&id, actor);
        }
    }

    /// Drop an actor's occupancy entry after it left the host entirely.
    pub fn actor_disconnected(&mut self, actor: ActorId) {
        if let Some(id) = self.occupancy.remove(&actor) {
            debug!("actor disconnected: actor={actor}, id={id}");
        }
    }

    /// Run one engine tick for a session. Hosts with their own scheduler
    /// call this from each fired task.
    pub fn tick(&mut self, id: &SessionId) -> Result<()> {
        let (lobby, state) = Self::resolve(&mut self.sessions, &mut self.states, id)?;
        let cadence = lobby.cadence().unwrap_or(self.config.tick_interval);
        engine::tick(
            lobby.as_mut(),
            state,
            &mut self.occupancy,
            &mut self.host,
            &mut self.events,
            cadence,
        );
        self.dispatch_events();
        Ok(())
    }

    /// Ids of all registered sessions, sorted by name.
    pub fn list(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Read-only projection of one session for operator tooling.
    pub fn info(&self, id: &SessionId) -> Result<SessionSnapshot> {
        let (Some(lobby), Some(state)) = (self.sessions.get(id), self.states.get(id)) else {
            return Err(Error::UnknownSession(id.clone()));
        };
        Ok(SessionSnapshot {
            id: id.clone(),
            display: lobby.display(),
            phase: state.phase(),
            lobby_elapsed: state.lobby_elapsed(),
            game_elapsed: state.game_elapsed(),
            members: state.members().to_vec(),
            extra: lobby.extra_info(),
        })
    }

    /// Number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether a session id is registered.
    pub fn is_registered(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// The session an actor currently occupies, if any.
    pub fn occupant_session(&self, actor: &ActorId) -> Option<&SessionId> {
        self.occupancy.session_of(actor)
    }

    /// Subscribe a lifecycle-event listener.
    pub fn add_listener(&mut self, listener: Box<dyn SessionListener>) {
        self.listeners.push(listener);
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Borrow the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutably borrow the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // Split-borrow lookup so callers keep the other registry fields free.
    fn resolve<'a>(
        sessions: &'a mut HashMap<SessionId, Box<dyn GameLobby>>,
        states: &'a mut HashMap<SessionId, SessionState>,
        id: &SessionId,
    ) -> Result<(&'a mut Box<dyn GameLobby>, &'a mut SessionState)> {
        match (sessions.get_mut(id), states.get_mut(id)) {
            (Some(lobby), Some(state)) => Ok((lobby, state)),
            _ => Err(Error::UnknownSession(id.clone())),
        }
    }

    // Deliver buffered events after the triggering mutation has completed.
    fn dispatch_events(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.events);
        for event in &events {
            for listener in &mut self.listeners {
                listener.on_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{Position, ZoneShape};

    use crate::testing::{ScriptedLobby, TestWorld};

    fn lobby(world: &TestWorld, id: &str) -> ScriptedLobby {
        let center = Position::new(world.world(), 0.0, 100.0, 0.0);
        ScriptedLobby::new(id, center, 20.0, ZoneShape::ColumnBox)
            .anchor(center.offset(5.0, 0.0, 0.0), center.offset(5.0, 10.0, 0.0))
    }

    fn registry() -> SessionRegistry<TestWorld> {
        SessionRegistry::new(TestWorld::new(), EngineConfig::default())
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = registry();
        let first = lobby(registry.host(), "duel");
        let second = lobby(registry.host(), "duel");

        registry.register(Box::new(first)).unwrap();
        let err = registry.register(Box::new(second)).unwrap_err();
        assert!(matches!(err, Error::DuplicateSession(_)));
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn test_register_rejects_empty_transfer_map() {
        let mut registry = registry();
        let center = Position::new(registry.host().world(), 0.0, 0.0, 0.0);
        let bare = ScriptedLobby::new("bare", center, 10.0, ZoneShape::Sphere);

        let err = registry.register(Box::new(bare)).unwrap_err();
        assert!(matches!(err, Error::EmptyTransferMap(_)));
        assert!(!registry.is_registered(&SessionId::from("bare")));
    }

    #[test]
    fn test_register_schedules_and_unregister_cancels() {
        let mut registry = registry();
        let session = lobby(registry.host(), "duel").with_cadence(5);
        registry.register(Box::new(session)).unwrap();
        assert_eq!(registry.scheduler().task_count(), 1);

        registry.unregister(&SessionId::from("duel")).unwrap();
        assert_eq!(registry.scheduler().task_count(), 0);
        assert!(matches!(
            registry.unregister(&SessionId::from("duel")),
            Err(Error::UnknownSession(_))
        ));
    }

    #[test]
    fn test_list_is_sorted() {
        let mut registry = registry();
        for id in ["zulu", "alpha", "mike"] {
            let session = lobby(registry.host(), id);
            registry.register(Box::new(session)).unwrap();
        }
        assert_eq!(
            registry.list(),
            vec![
                SessionId::from("alpha"),
                SessionId::from("mike"),
                SessionId::from("zulu"),
            ]
        );
    }

    #[test]
    fn test_info_unknown_session() {
        let registry = registry();
        assert!(matches!(
            registry.info(&SessionId::from("nope")),
            Err(Error::UnknownSession(_))
        ));
    }

    #[test]
    fn test_info_projects_state() {
        let mut registry = registry();
        let mut session = lobby(registry.host(), "duel");
        session.extra = vec!["round 1".to_string()];
        registry.register(Box::new(session)).unwrap();
        registry.try_open(&SessionId::from("duel")).unwrap();

        let snapshot = registry.info(&SessionId::from("duel")).unwrap();
        assert_eq!(snapshot.display, "duel");
        assert_eq!(snapshot.phase, SessionPhase::Open);
        assert_eq!(snapshot.extra, vec!["round 1".to_string()]);
    }
}
