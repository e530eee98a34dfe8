//! Remote player tracking.
//!
//! The registry is the client-local authority on which remote players exist
//! and where they are. It applies enter/update/exit transitions against a
//! plain id-to-handle map and drives the presentation layer. Each tracked id
//! moves `Absent -> Tracked -> Absent`; the local player is never tracked.

use std::collections::HashMap;

use demo_shared::math::Vec2;
use demo_shared::protocol::{GameState, Player, PlayerId};
use tracing::{debug, info};

use crate::presentation::{EntityHandle, Presentation};

struct Tracked {
    player: Player,
    handle: EntityHandle,
}

/// Authoritative mirror of remote player state.
pub struct PlayerRegistry<P: Presentation> {
    local_id: PlayerId,
    presentation: P,
    tracked: HashMap<PlayerId, Tracked>,
}

impl<P: Presentation> PlayerRegistry<P> {
    pub fn new(local_id: PlayerId, presentation: P) -> Self {
        Self {
            local_id,
            presentation,
            tracked: HashMap::new(),
        }
    }

    /// Starts tracking a newly entered remote player.
    ///
    /// Echoes of the local player and duplicate enters are no-ops; the
    /// server delivers at least once.
    pub fn on_enter(&mut self, player: Player) {
        if player.id == self.local_id {
            debug!(id = %player.id, "Ignoring enter echo for local player");
            return;
        }
        if self.tracked.contains_key(&player.id) {
            debug!(id = %player.id, "Ignoring duplicate enter");
            return;
        }
        let handle = self.presentation.spawn_entity(player.position);
        info!(id = %player.id, "Remote player entered");
        self.tracked.insert(player.id.clone(), Tracked { player, handle });
    }

    /// Moves a tracked remote player.
    ///
    /// An update for an unknown id is dropped, never promoted to an
    /// implicit enter.
    pub fn on_update(&mut self, player: Player) {
        if player.id == self.local_id {
            return;
        }
        match self.tracked.get_mut(&player.id) {
            Some(entry) => {
                entry.player.position = player.position;
                self.presentation
                    .set_entity_position(entry.handle, player.position);
            }
            None => debug!(id = %player.id, "Dropping update for untracked player"),
        }
    }

    /// Stops tracking an exited player. Redundant exits are no-ops.
    pub fn on_exit(&mut self, id: &PlayerId) {
        match self.tracked.remove(id) {
            Some(entry) => {
                self.presentation.destroy_entity(entry.handle);
                info!(id = %id, "Remote player exited");
            }
            None => debug!(id = %id, "Ignoring exit for untracked player"),
        }
    }

    /// Catches up on players already present when this client joined.
    pub fn on_game_state(&mut self, state: GameState) {
        for (_, player) in state.player_id_to_player {
            self.on_enter(player);
        }
    }

    /// Destroys every tracked entity. Called at session teardown.
    pub fn clear(&mut self) {
        for (_, entry) in self.tracked.drain() {
            self.presentation.destroy_entity(entry.handle);
        }
    }

    pub fn local_id(&self) -> &PlayerId {
        &self.local_id
    }

    pub fn is_tracked(&self, id: &PlayerId) -> bool {
        self.tracked.contains_key(id)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Last-known position of a tracked player.
    pub fn position_of(&self, id: &PlayerId) -> Option<Vec2> {
        self.tracked.get(id).map(|t| t.player.position)
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }
}
