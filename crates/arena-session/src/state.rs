//! Registry-owned per-session lifecycle state.

use arena_core::{ActorId, SessionPhase};

use crate::scheduler::TaskHandle;

/// Zone occupants grouped by nearest rally point.
///
/// Groups are indexed parallel to the session's transfer map: group `i` holds
/// the actors whose nearest anchor is route `i`. Rebuilt from scratch by
/// every zone scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Factions {
    groups: Vec<Vec<ActorId>>,
}

impl Factions {
    /// Clear all groups and size for `anchors` rally points.
    pub fn reset(&mut self, anchors: usize) {
        self.groups.clear();
        self.groups.resize_with(anchors, Vec::new);
    }

    /// Append an actor to the group for anchor `index`.
    ///
    /// Out-of-range indices are ignored; the scan only produces indices from
    /// the transfer map it sized the groups from.
    pub fn assign(&mut self, index: usize, actor: ActorId) {
        if let Some(group) = self.groups.get_mut(index) {
            group.push(actor);
        }
    }

    /// Members of the group for anchor `index`, in scan order.
    pub fn group(&self, index: usize) -> &[ActorId] {
        self.groups.get(index).map_or(&[], Vec::as_slice)
    }

    /// Number of groups (equals the transfer map's route count after a scan).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group holds any actor.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    /// Remove an actor from whichever group holds it.
    pub fn remove(&mut self, actor: &ActorId) {
        for group in &mut self.groups {
            group.retain(|member| member != actor);
        }
    }

    /// Iterate over `(anchor index, group members)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[ActorId])> {
        self.groups
            .iter()
            .enumerate()
            .map(|(index, group)| (index, group.as_slice()))
    }

    /// Clear all groups.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

/// Mutable lifecycle record for one registered session.
///
/// Owned by the registry, keyed by session id; the session value itself stays
/// a stateless descriptor. Fields are crate-private so that only the
/// lifecycle engine's transition points can assign the phase.
#[derive(Debug)]
pub struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) lobby_elapsed: u64,
    pub(crate) game_elapsed: u64,
    pub(crate) members: Vec<ActorId>,
    pub(crate) factions: Factions,
    pub(crate) task: Option<TaskHandle>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Closed,
            lobby_elapsed: 0,
            game_elapsed: 0,
            members: Vec::new(),
            factions: Factions::default(),
            task: None,
        }
    }
}

impl SessionState {
    /// Fresh state: phase closed, timers zeroed, no members.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Ticks since the lobby last opened.
    pub fn lobby_elapsed(&self) -> u64 {
        self.lobby_elapsed
    }

    /// Ticks since the game started.
    pub fn game_elapsed(&self) -> u64 {
        self.game_elapsed
    }

    /// Current zone occupants, in scan order.
    pub fn members(&self) -> &[ActorId] {
        &self.members
    }

    /// Current faction assignment.
    pub fn factions(&self) -> &Factions {
        &self.factions
    }

    /// Full reset applied when the lobby opens.
    pub(crate) fn reset_for_open(&mut self) {
        self.lobby_elapsed = 0;
        self.game_elapsed = 0;
        self.members.clear();
        self.factions.clear();
    }

    /// Drop all membership bookkeeping (occupancy is the caller's concern).
    pub(crate) fn clear_members(&mut self) {
        self.members.clear();
        self.factions.clear();
    }

    /// Remove one actor from members and factions.
    pub(crate) fn remove_member(&mut self, actor: &ActorId) {
        self.members.retain(|member| member != actor);
        self.factions.remove(actor);
    }
}
