//! The session contract implemented by every concrete game type.

use arena_core::{ActorId, Position, SessionId, TransferMap, Zone};

use crate::state::Factions;

/// Behavioral contract for one game type.
///
/// Implementations are descriptors plus game rules: lifecycle state (timers,
/// phase, membership) lives in the registry's side table, never here. The
/// shared lifecycle engine calls the predicates to decide transitions and the
/// hooks to let the game react; hooks take `&mut self` so a game may keep its
/// own private data (scores, round counters).
///
/// Elapsed times are measured in host ticks and advance by the session's
/// cadence on every engine update.
pub trait GameLobby {
    /// Registry identifier. Must be stable for the lifetime of the value.
    fn id(&self) -> SessionId;

    /// Operator-facing display name.
    fn display(&self) -> String {
        self.id().to_string()
    }

    /// The session's spatial zone. The zone center doubles as the lobby
    /// rally position actors are teleported to on join and on finish.
    fn zone(&self) -> Zone;

    /// Rally-point routes: where each faction is sent when the game starts.
    ///
    /// Must be non-empty; registration rejects an empty map. The engine
    /// treats the returned map as read-only.
    fn transfer(&self) -> TransferMap;

    /// Ticks between engine updates for this session, or `None` to use the
    /// registry's configured base cadence.
    fn cadence(&self) -> Option<u64> {
        None
    }

    /// Whether the session's preconditions to open are met. Gates both
    /// command-triggered and automatic opens.
    fn is_ready(&self) -> bool {
        true
    }

    /// Whether the lobby should open automatically this tick. Useful for
    /// wall-clock or periodic schedules.
    fn should_open(&self) -> bool {
        false
    }

    /// Whether the game should start. On start, every faction is relocated
    /// through the transfer map.
    fn should_start(&self, lobby_elapsed: u64, members: &[ActorId], factions: &Factions) -> bool;

    /// Whether the game should finish. On finish, every member is returned
    /// to the zone center.
    fn should_finish(
        &self,
        lobby_elapsed: u64,
        game_elapsed: u64,
        members: &[ActorId],
        factions: &Factions,
    ) -> bool;

    /// Whether the lobby should close. Only consulted while the phase
    /// permits closing.
    fn should_close(&self, lobby_elapsed: u64) -> bool;

    /// Veto hook for joins; return `false` to reject the actor.
    fn on_actor_join(&mut self, _actor: ActorId) -> bool {
        true
    }

    /// Veto hook for voluntary quits; return `false` to keep the actor in.
    fn on_actor_quit(&mut self, _actor: ActorId) -> bool {
        true
    }

    /// Per-participant start relocation hook. `destination` is the faction's
    /// transfer target; return a (possibly adjusted) target, or `None` to
    /// cancel this participant's relocation without affecting the rest of
    /// the group.
    fn on_actor_start(&mut self, _actor: ActorId, destination: Position) -> Option<Position> {
        Some(destination)
    }

    /// Called when a member dies. Return `true` to have the registry kick
    /// the actor out of the session.
    fn on_actor_death(&mut self, _actor: ActorId) -> bool {
        true
    }

    /// Called when the lobby opens.
    fn on_open(&mut self) {}

    /// Called when the game starts, before participants are relocated.
    fn on_start(&mut self) {}

    /// Called once per engine update while the lobby is not closed.
    fn on_update(&mut self, _lobby_elapsed: u64, _game_elapsed: u64) {}

    /// Called when the game finishes, before participants are returned to
    /// the zone center.
    fn on_finish(&mut self) {}

    /// Called when the lobby closes, before membership is cleared.
    fn on_close(&mut self) {}

    /// Extra lines appended to the `info` projection.
    fn extra_info(&self) -> Vec<String> {
        Vec::new()
    }
}
