//! Testing utilities: an in-memory host, a scriptable lobby and an
//! event-recording listener.
//!
//! These double as a reference for host integrators; nothing in here touches
//! a real world or a real clock.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use arena_core::{ActorId, Position, SessionId, TransferMap, WorldId, Zone, ZoneShape};

use crate::event::{SessionEvent, SessionListener};
use crate::host::Host;
use crate::lobby::GameLobby;
use crate::state::Factions;

/// In-memory [`Host`] with a single world and explicit actor placement.
///
/// Actors are reported in spawn order so scans are deterministic.
#[derive(Debug)]
pub struct TestWorld {
    world: WorldId,
    order: Vec<ActorId>,
    positions: HashMap<ActorId, Position>,
}

impl TestWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self {
            world: WorldId::new(),
            order: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// The id of this host's only world.
    pub fn world(&self) -> WorldId {
        self.world
    }

    /// Add a new actor at the given position.
    pub fn spawn(&mut self, position: Position) -> ActorId {
        let actor = ActorId::new();
        self.order.push(actor);
        self.positions.insert(actor, position);
        actor
    }

    /// Move an existing actor (no-op for unknown actors, like a real host).
    pub fn place(&mut self, actor: ActorId, position: Position) {
        if let Some(current) = self.positions.get_mut(&actor) {
            *current = position;
        }
    }

    /// Remove an actor from the world entirely.
    pub fn despawn(&mut self, actor: &ActorId) {
        self.order.retain(|known| known != actor);
        self.positions.remove(actor);
    }

    /// Where an actor currently stands.
    pub fn position_of(&self, actor: &ActorId) -> Option<Position> {
        self.positions.get(actor).copied()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for TestWorld {
    fn actors_in_world(&self, world: WorldId) -> Vec<ActorId> {
        if world != self.world {
            return Vec::new();
        }
        self.order.clone()
    }

    fn position(&self, actor: ActorId) -> Option<Position> {
        self.positions.get(&actor).copied()
    }

    fn teleport(&mut self, actor: ActorId, target: Position) {
        self.place(actor, target);
    }
}

/// A [`GameLobby`] whose predicates are plain data, for exercising the
/// lifecycle engine without writing a game.
///
/// All thresholds compare against elapsed ticks; `None` means "never".
#[derive(Debug)]
pub struct ScriptedLobby {
    /// Session id
    pub id: SessionId,
    /// Spatial zone
    pub zone: Zone,
    /// Rally-point routes
    pub transfer: TransferMap,
    /// Per-session cadence override
    pub cadence: Option<u64>,
    /// Readiness gate for opening
    pub ready: bool,
    /// Open automatically on the next tick
    pub auto_open: bool,
    /// Start once `lobby_elapsed` reaches this
    pub start_at: Option<u64>,
    /// Finish once `lobby_elapsed` reaches this
    pub finish_lobby_at: Option<u64>,
    /// Finish once `game_elapsed` reaches this
    pub finish_game_at: Option<u64>,
    /// Close once `lobby_elapsed` reaches this
    pub close_at: Option<u64>,
    /// Whether joins are accepted
    pub allow_join: bool,
    /// Whether quits are accepted
    pub allow_quit: bool,
    /// Whether a death evicts the actor
    pub kick_on_death: bool,
    /// Actors whose start relocation is vetoed
    pub hold_on_start: HashSet<ActorId>,
    /// Lines returned from `extra_info`
    pub extra: Vec<String>,
    /// Number of `on_open` calls observed
    pub opened: u32,
    /// Number of `on_start` calls observed
    pub started: u32,
    /// Number of `on_update` calls observed
    pub updates: u32,
    /// Number of `on_finish` calls observed
    pub finished: u32,
    /// Number of `on_close` calls observed
    pub closed: u32,
}

impl ScriptedLobby {
    /// Create a lobby with the given zone and no routes or thresholds.
    pub fn new(id: &str, center: Position, radius: f64, shape: ZoneShape) -> Self {
        Self {
            id: SessionId::from(id),
            zone: Zone::new(center, radius, shape),
            transfer: TransferMap::new(),
            cadence: None,
            ready: true,
            auto_open: false,
            start_at: None,
            finish_lobby_at: None,
            finish_game_at: None,
            close_at: None,
            allow_join: true,
            allow_quit: true,
            kick_on_death: true,
            hold_on_start: HashSet::new(),
            extra: Vec::new(),
            opened: 0,
            started: 0,
            updates: 0,
            finished: 0,
            closed: 0,
        }
    }

    /// Add a rally-point route.
    pub fn anchor(mut self, anchor: Position, destination: Position) -> Self {
        self.transfer = self.transfer.route(anchor, destination);
        self
    }

    /// Set the lobby-elapsed start threshold.
    pub fn starts_at(mut self, lobby_elapsed: u64) -> Self {
        self.start_at = Some(lobby_elapsed);
        self
    }

    /// Set the finish thresholds (either reaching first finishes).
    pub fn finishes_at(mut self, lobby_elapsed: u64, game_elapsed: u64) -> Self {
        self.finish_lobby_at = Some(lobby_elapsed);
        self.finish_game_at = Some(game_elapsed);
        self
    }

    /// Set the lobby-elapsed close threshold.
    pub fn closes_at(mut self, lobby_elapsed: u64) -> Self {
        self.close_at = Some(lobby_elapsed);
        self
    }

    /// Set the per-session cadence.
    pub fn with_cadence(mut self, cadence: u64) -> Self {
        self.cadence = Some(cadence);
        self
    }
}

impl GameLobby for ScriptedLobby {
    fn id(&self) -> SessionId {
        self.id.clone()
    }

    fn zone(&self) -> Zone {
        self.zone
    }

    fn transfer(&self) -> TransferMap {
        self.transfer.clone()
    }

    fn cadence(&self) -> Option<u64> {
        self.cadence
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn should_open(&self) -> bool {
        self.auto_open
    }

    fn should_start(&self, lobby_elapsed: u64, _members: &[ActorId], _factions: &Factions) -> bool {
        self.start_at.is_some_and(|at| lobby_elapsed >= at)
    }

    fn should_finish(
        &self,
        lobby_elapsed: u64,
        game_elapsed: u64,
        _members: &[ActorId],
        _factions: &Factions,
    ) -> bool {
        self.finish_lobby_at.is_some_and(|at| lobby_elapsed >= at)
            || self.finish_game_at.is_some_and(|at| game_elapsed >= at)
    }

    fn should_close(&self, lobby_elapsed: u64) -> bool {
        self.close_at.is_some_and(|at| lobby_elapsed >= at)
    }

    fn on_actor_join(&mut self, _actor: ActorId) -> bool {
        self.allow_join
    }

    fn on_actor_quit(&mut self, _actor: ActorId) -> bool {
        self.allow_quit
    }

    fn on_actor_start(&mut self, actor: ActorId, destination: Position) -> Option<Position> {
        if self.hold_on_start.contains(&actor) {
            None
        } else {
            Some(destination)
        }
    }

    fn on_actor_death(&mut self, _actor: ActorId) -> bool {
        self.kick_on_death
    }

    fn on_open(&mut self) {
        self.opened += 1;
    }

    fn on_start(&mut self) {
        self.started += 1;
    }

    fn on_update(&mut self, _lobby_elapsed: u64, _game_elapsed: u64) {
        self.updates += 1;
    }

    fn on_finish(&mut self) {
        self.finished += 1;
    }

    fn on_close(&mut self) {
        self.closed += 1;
    }

    fn extra_info(&self) -> Vec<String> {
        self.extra.clone()
    }
}

/// Listener that records every event into a shared buffer.
pub struct RecordingListener {
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl RecordingListener {
    /// Create a listener and return it with a handle to its buffer.
    pub fn new() -> (Self, Rc<RefCell<Vec<SessionEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                events: Rc::clone(&events),
            },
            events,
        )
    }
}

impl SessionListener for RecordingListener {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_spawn_order_is_stable() {
        let mut world = TestWorld::new();
        let origin = Position::new(world.world(), 0.0, 0.0, 0.0);
        let a = world.spawn(origin);
        let b = world.spawn(origin.offset(1.0, 0.0, 0.0));

        assert_eq!(world.actors_in_world(world.world()), vec![a, b]);
        assert!(world.actors_in_world(WorldId::new()).is_empty());

        world.despawn(&a);
        assert_eq!(world.actors_in_world(world.world()), vec![b]);
    }

    #[test]
    fn test_teleport_moves_actor() {
        let mut world = TestWorld::new();
        let origin = Position::new(world.world(), 0.0, 0.0, 0.0);
        let actor = world.spawn(origin);
        world.teleport(actor, origin.offset(0.0, 5.0, 0.0));

        assert_eq!(world.position_of(&actor).unwrap().y, 5.0);
    }

    #[test]
    fn test_recording_listener_captures_events() {
        let (mut listener, events) = RecordingListener::new();
        listener.on_event(&SessionEvent::Opened(SessionId::from("a")));

        assert_eq!(
            events.borrow().as_slice(),
            &[SessionEvent::Opened(SessionId::from("a"))]
        );
    }
}
