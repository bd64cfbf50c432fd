//! The shared lifecycle engine.
//!
//! Free functions over the [`GameLobby`] contract plus the registry-owned
//! collections, so the registry can hand each one exactly the disjoint
//! borrows it needs. Phase assignment happens only here.

use tracing::debug;

use arena_core::{Error, Result, SessionPhase};

use crate::event::SessionEvent;
use crate::host::Host;
use crate::lobby::GameLobby;
use crate::occupancy::Occupancy;
use crate::state::SessionState;

/// Open the lobby: `Closed`/`Finished` → `Open`.
///
/// Gated on the session's readiness check and the phase legality table.
/// On success the state is fully reset (timers zeroed, membership cleared).
pub(crate) fn open(
    lobby: &mut dyn GameLobby,
    state: &mut SessionState,
    events: &mut Vec<SessionEvent>,
) -> Result<()> {
    let id = lobby.id();
    if !lobby.is_ready() {
        return Err(Error::NotReady(id));
    }
    if !state.phase.can_open() {
        return Err(Error::IllegalTransition {
            session: id,
            action: "open",
            phase: state.phase,
        });
    }
    events.push(SessionEvent::Opened(id.clone()));
    lobby.on_open();
    state.reset_for_open();
    state.phase = SessionPhase::Open;
    debug!("session opened: id={id}");
    Ok(())
}

/// Close the lobby: `Open`/`Finished` → `Closed`.
///
/// Closing from `Open` evicts every member from occupancy; closing from
/// `Finished` does too, but the members were deliberately left in place by
/// [`finish`] so the outcome stayed observable until now.
pub(crate) fn close(
    lobby: &mut dyn GameLobby,
    state: &mut SessionState,
    occupancy: &mut Occupancy,
    events: &mut Vec<SessionEvent>,
) -> Result<()> {
    let id = lobby.id();
    if !state.phase.can_close() {
        return Err(Error::IllegalTransition {
            session: id,
            action: "close",
            phase: state.phase,
        });
    }
    events.push(SessionEvent::Closed(id.clone()));
    lobby.on_close();
    for member in state.members() {
        occupancy.remove(member);
    }
    state.clear_members();
    state.phase = SessionPhase::Closed;
    debug!("session closed: id={id}");
    Ok(())
}

/// Finish the game: relocate every member to the zone center (keeping each
/// actor's facing) and enter `Finished`.
///
/// Members, factions and occupancy are deliberately retained: finish is an
/// observation point, not a teardown. Legality is the caller's concern
/// (`tick` consults `can_finish`, force-finish requires `Started`).
pub(crate) fn finish<H: Host>(
    lobby: &mut dyn GameLobby,
    state: &mut SessionState,
    host: &mut H,
    events: &mut Vec<SessionEvent>,
) {
    let id = lobby.id();
    events.push(SessionEvent::Finished(id.clone()));
    lobby.on_finish();
    let center = lobby.zone().center;
    for member in state.members() {
        let target = match host.position(*member) {
            Some(current) => center.facing_from(&current),
            None => center,
        };
        host.teleport(*member, target);
    }
    state.phase = SessionPhase::Finished;
    debug!("session finished: id={id}");
}

/// One periodic engine update. `cadence` is the tick count this invocation
/// represents; both elapsed timers advance by it.
pub(crate) fn tick<H: Host>(
    lobby: &mut dyn GameLobby,
    state: &mut SessionState,
    occupancy: &mut Occupancy,
    host: &mut H,
    events: &mut Vec<SessionEvent>,
    cadence: u64,
) {
    if lobby.should_open() {
        // Automatic opens are best effort; a lobby asking to open from an
        // illegal phase simply stays put.
        let _ = open(lobby, state, events);
    }
    if state.phase == SessionPhase::Closed {
        return;
    }

    state.lobby_elapsed += cadence;

    if state.phase == SessionPhase::Open {
        scan(&*lobby, state, occupancy, host);
        if lobby.should_start(state.lobby_elapsed, &state.members, &state.factions) {
            start(lobby, state, host, events);
        }
    }
    if state.phase == SessionPhase::Started {
        state.game_elapsed += cadence;
    }

    events.push(SessionEvent::Updated(lobby.id()));
    lobby.on_update(state.lobby_elapsed, state.game_elapsed);

    if state.phase.can_finish()
        && lobby.should_finish(
            state.lobby_elapsed,
            state.game_elapsed,
            &state.members,
            &state.factions,
        )
    {
        finish(lobby, state, host, events);
    }
    if state.phase.can_close() && lobby.should_close(state.lobby_elapsed) {
        let _ = close(lobby, state, occupancy, events);
    }
}

/// Start transition: `Open` → `Started`, then route every faction through
/// the transfer map, giving the session a per-participant veto.
fn start<H: Host>(
    lobby: &mut dyn GameLobby,
    state: &mut SessionState,
    host: &mut H,
    events: &mut Vec<SessionEvent>,
) {
    let id = lobby.id();
    events.push(SessionEvent::Started(id.clone()));
    lobby.on_start();
    state.phase = SessionPhase::Started;

    let transfer = lobby.transfer();
    for (index, group) in state.factions.iter() {
        let Some(route) = transfer.get(index) else {
            continue;
        };
        for actor in group {
            // `None` cancels this participant's relocation only.
            if let Some(target) = lobby.on_actor_start(*actor, route.destination) {
                host.teleport(*actor, target);
            }
        }
    }
    debug!("session started: id={id}, members={}", state.members.len());
}

/// Zone scan: rebuild `members` and `factions` from the host's current actor
/// positions.
///
/// Only actors the occupancy map assigns to this session count, and only
/// while they stand inside the zone; a joined actor outside the zone is
/// skipped for this tick but keeps its occupancy entry. Each contained actor
/// joins the faction of its nearest anchor (ties to the earliest route).
fn scan<H: Host>(
    lobby: &dyn GameLobby,
    state: &mut SessionState,
    occupancy: &Occupancy,
    host: &H,
) {
    let id = lobby.id();
    let zone = lobby.zone();
    let transfer = lobby.transfer();

    state.members.clear();
    state.factions.reset(transfer.len());

    for actor in host.actors_in_world(zone.center.world) {
        if !occupancy.is_assigned_to(&actor, &id) {
            continue;
        }
        let Some(position) = host.position(actor) else {
            continue;
        };
        if !zone.contains(&position) {
            continue;
        }
        let Some(anchor) = transfer.nearest_anchor(&position) else {
            continue;
        };
        state.factions.assign(anchor, actor);
        state.members.push(actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ActorId, Position, SessionId, ZoneShape};

    use crate::state::Factions;
    use crate::testing::{ScriptedLobby, TestWorld};

    fn fixture() -> (ScriptedLobby, TestWorld, SessionState, Occupancy) {
        let world = TestWorld::new();
        let center = Position::new(world.world(), 0.0, 100.0, 0.0);
        // Two anchors east and west of center, destinations raised by 10.
        let lobby = ScriptedLobby::new("duel", center, 20.0, ZoneShape::ColumnBox)
            .anchor(center.offset(5.0, 0.0, 0.0), center.offset(5.0, 10.0, 0.0))
            .anchor(center.offset(-5.0, 0.0, 0.0), center.offset(-5.0, 10.0, 0.0));
        (lobby, world, SessionState::new(), Occupancy::new())
    }

    fn join(occupancy: &mut Occupancy, actor: ActorId, id: &str) {
        occupancy.insert(actor, SessionId::from(id));
    }

    #[test]
    fn test_scan_assigns_nearest_anchor() {
        let (lobby, mut world, mut state, mut occupancy) = fixture();
        let center = lobby.zone().center;
        let east = world.spawn(center.offset(4.0, 0.0, 1.0));
        let west = world.spawn(center.offset(-6.0, 0.0, 0.0));
        join(&mut occupancy, east, "duel");
        join(&mut occupancy, west, "duel");

        scan(&lobby, &mut state, &occupancy, &world);

        assert_eq!(state.members().len(), 2);
        assert_eq!(state.factions().group(0), &[east]);
        assert_eq!(state.factions().group(1), &[west]);
    }

    #[test]
    fn test_scan_is_idempotent_without_movement() {
        let (lobby, mut world, mut state, mut occupancy) = fixture();
        let center = lobby.zone().center;
        for offset in [1.0, -2.0, 3.0] {
            let actor = world.spawn(center.offset(offset, 0.0, offset));
            join(&mut occupancy, actor, "duel");
        }

        scan(&lobby, &mut state, &occupancy, &world);
        let members_first = state.members().to_vec();
        let factions_first: Factions = state.factions().clone();

        scan(&lobby, &mut state, &occupancy, &world);
        assert_eq!(state.members(), members_first.as_slice());
        assert_eq!(state.factions(), &factions_first);
    }

    #[test]
    fn test_scan_skips_unjoined_and_out_of_zone() {
        let (lobby, mut world, mut state, mut occupancy) = fixture();
        let center = lobby.zone().center;
        let joined_outside = world.spawn(center.offset(50.0, 0.0, 0.0));
        let unjoined_inside = world.spawn(center.offset(1.0, 0.0, 0.0));
        let other_session = world.spawn(center.offset(2.0, 0.0, 0.0));
        join(&mut occupancy, joined_outside, "duel");
        join(&mut occupancy, other_session, "race");

        scan(&lobby, &mut state, &occupancy, &world);

        assert!(state.members().is_empty());
        // Zone exit does not cost the actor its membership entry.
        assert!(occupancy.is_assigned_to(&joined_outside, &SessionId::from("duel")));
        let _ = unjoined_inside;
    }

    #[test]
    fn test_open_resets_and_fires_event() {
        let (mut lobby, _world, mut state, _occupancy) = fixture();
        let mut events = Vec::new();
        state.lobby_elapsed = 77;

        open(&mut lobby, &mut state, &mut events).unwrap();

        assert_eq!(state.phase(), SessionPhase::Open);
        assert_eq!(state.lobby_elapsed(), 0);
        assert_eq!(events, vec![SessionEvent::Opened(SessionId::from("duel"))]);

        // Reopening an open lobby is illegal.
        let err = open(&mut lobby, &mut state, &mut events).unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalTransition {
                action: "open",
                phase: SessionPhase::Open,
                ..
            }
        ));
    }

    #[test]
    fn test_open_gated_on_readiness() {
        let (mut lobby, _world, mut state, _occupancy) = fixture();
        lobby.ready = false;
        let err = open(&mut lobby, &mut state, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::NotReady(_)));
        assert_eq!(state.phase(), SessionPhase::Closed);
    }

    #[test]
    fn test_finish_preserves_facing_and_membership() {
        let (mut lobby, mut world, mut state, mut occupancy) = fixture();
        let center = lobby.zone().center;
        let actor = world.spawn(center.offset(4.0, 0.0, 0.0).with_facing(135.0, 20.0));
        join(&mut occupancy, actor, "duel");

        open(&mut lobby, &mut state, &mut Vec::new()).unwrap();
        scan(&lobby, &mut state, &occupancy, &world);
        let mut events = Vec::new();
        finish(&mut lobby, &mut state, &mut world, &mut events);

        assert_eq!(state.phase(), SessionPhase::Finished);
        let landed = world.position_of(&actor).unwrap();
        assert_eq!((landed.x, landed.y, landed.z), (center.x, center.y, center.z));
        assert_eq!((landed.yaw, landed.pitch), (135.0, 20.0));
        // Finish is an observation point: nothing is evicted.
        assert_eq!(state.members(), &[actor]);
        assert!(occupancy.is_assigned_to(&actor, &SessionId::from("duel")));
        assert_eq!(events, vec![SessionEvent::Finished(SessionId::from("duel"))]);
    }

    #[test]
    fn test_close_from_open_evicts_members() {
        let (mut lobby, mut world, mut state, mut occupancy) = fixture();
        let center = lobby.zone().center;
        let actor = world.spawn(center.offset(1.0, 0.0, 0.0));
        join(&mut occupancy, actor, "duel");

        open(&mut lobby, &mut state, &mut Vec::new()).unwrap();
        scan(&lobby, &mut state, &occupancy, &world);
        assert_eq!(state.members().len(), 1);

        close(&mut lobby, &mut state, &mut occupancy, &mut Vec::new()).unwrap();
        assert_eq!(state.phase(), SessionPhase::Closed);
        assert!(state.members().is_empty());
        assert!(occupancy.is_empty());
    }

    #[test]
    fn test_start_veto_cancels_single_relocation() {
        let (mut lobby, mut world, mut state, mut occupancy) = fixture();
        let center = lobby.zone().center;
        let mover = world.spawn(center.offset(4.0, 0.0, 0.0));
        let vetoed = world.spawn(center.offset(4.5, 0.0, 0.0));
        join(&mut occupancy, mover, "duel");
        join(&mut occupancy, vetoed, "duel");
        lobby.hold_on_start.insert(vetoed);
        lobby.start_at = Some(0); // start on the first tick

        open(&mut lobby, &mut state, &mut Vec::new()).unwrap();
        let mut events = Vec::new();
        tick(&mut lobby, &mut state, &mut occupancy, &mut world, &mut events, 20);

        assert_eq!(state.phase(), SessionPhase::Started);
        let east_destination = lobby.transfer().get(0).unwrap().destination;
        let moved = world.position_of(&mover).unwrap();
        assert_eq!(moved.y, east_destination.y);
        // The vetoed actor stayed put; the rest of the faction moved.
        let held = world.position_of(&vetoed).unwrap();
        assert_eq!(held.y, center.y);
    }

    #[test]
    fn test_tick_noop_while_closed() {
        let (mut lobby, mut world, mut state, mut occupancy) = fixture();
        let mut events = Vec::new();
        tick(&mut lobby, &mut state, &mut occupancy, &mut world, &mut events, 20);

        assert_eq!(state.phase(), SessionPhase::Closed);
        assert_eq!(state.lobby_elapsed(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_tick_auto_opens() {
        let (mut lobby, mut world, mut state, mut occupancy) = fixture();
        lobby.auto_open = true;
        let mut events = Vec::new();
        tick(&mut lobby, &mut state, &mut occupancy, &mut world, &mut events, 20);

        assert_eq!(state.phase(), SessionPhase::Open);
        assert_eq!(state.lobby_elapsed(), 20);
        assert_eq!(
            events,
            vec![
                SessionEvent::Opened(SessionId::from("duel")),
                SessionEvent::Updated(SessionId::from("duel")),
            ]
        );
    }
}
