//! The host environment boundary.

use arena_core::{ActorId, Position, WorldId};

/// World-side services the lifecycle engine consumes.
///
/// The host owns world geometry, actor presence and relocation; the engine
/// only queries and requests. Implementations are expected to be cheap,
/// synchronous and non-blocking, per the single-threaded tick contract.
pub trait Host {
    /// Actors currently present in the given world, in host order.
    fn actors_in_world(&self, world: WorldId) -> Vec<ActorId>;

    /// Current position of an actor, or `None` if the host no longer tracks
    /// it (disconnected, despawned).
    fn position(&self, actor: ActorId) -> Option<Position>;

    /// Relocate an actor. The target position carries the facing to apply.
    ///
    /// Unknown actors are ignored; relocation is best effort by design since
    /// an actor can vanish between a scan and the transition that moves it.
    fn teleport(&mut self, actor: ActorId, target: Position);
}
