//! Presentation seam.
//!
//! The sync core never draws anything itself. It asks a [`Presentation`]
//! implementation to spawn, move, and destroy the visual entities bound to
//! remote players, and to report where the local player currently is.

use std::collections::HashMap;

use demo_shared::math::Vec2;
use tracing::debug;

/// Opaque handle to a visual entity owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

/// Rendering/input collaborator the registry and session call out to.
pub trait Presentation {
    /// Creates a visual entity at `position` and returns its handle.
    fn spawn_entity(&mut self, position: Vec2) -> EntityHandle;
    fn set_entity_position(&mut self, handle: EntityHandle, position: Vec2);
    fn destroy_entity(&mut self, handle: EntityHandle);
    /// Current position of the local player's visual entity.
    fn local_position(&self) -> Vec2;
}

const AUTOPILOT_DIRS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(-1.0, 0.0),
];
const AUTOPILOT_SPEED: f32 = 2.0;
const AUTOPILOT_LEG_SECS: f32 = 1.0;

/// Renderer-free scene for the demo binary and tests.
///
/// Remote entities live in a map keyed by handle. The local player walks a
/// small square via an autopilot so several clients pointed at one server
/// can be watched moving without any input handling.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    next_handle: u64,
    entities: HashMap<EntityHandle, Vec2>,
    local_pos: Vec2,
    leg: usize,
    leg_elapsed: f32,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the local player along the autopilot path by `dt` seconds.
    pub fn autopilot_step(&mut self, dt: f32) {
        self.leg_elapsed += dt;
        if self.leg_elapsed >= AUTOPILOT_LEG_SECS {
            self.leg_elapsed = 0.0;
            self.leg = (self.leg + 1) % AUTOPILOT_DIRS.len();
        }
        let dir = AUTOPILOT_DIRS[self.leg];
        let target = Vec2::new(self.local_pos.x + dir.x, self.local_pos.y + dir.y);
        self.local_pos = self.local_pos.move_towards(target, AUTOPILOT_SPEED * dt);
    }

    /// Places the local player directly. Embedders with real input use this
    /// instead of the autopilot.
    pub fn set_local_position(&mut self, position: Vec2) {
        self.local_pos = position;
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_position(&self, handle: EntityHandle) -> Option<Vec2> {
        self.entities.get(&handle).copied()
    }
}

impl Presentation for HeadlessScene {
    fn spawn_entity(&mut self, position: Vec2) -> EntityHandle {
        self.next_handle += 1;
        let handle = EntityHandle(self.next_handle);
        self.entities.insert(handle, position);
        debug!(?handle, x = position.x, y = position.y, "Spawned entity");
        handle
    }

    fn set_entity_position(&mut self, handle: EntityHandle, position: Vec2) {
        if let Some(pos) = self.entities.get_mut(&handle) {
            *pos = position;
        }
    }

    fn destroy_entity(&mut self, handle: EntityHandle) {
        self.entities.remove(&handle);
        debug!(?handle, "Destroyed entity");
    }

    fn local_position(&self) -> Vec2 {
        self.local_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_live_until_destroyed() {
        let mut scene = HeadlessScene::new();
        let a = scene.spawn_entity(Vec2::ZERO);
        let b = scene.spawn_entity(Vec2::new(1.0, 1.0));
        assert_ne!(a, b);
        assert_eq!(scene.entity_count(), 2);

        scene.destroy_entity(a);
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.entity_position(a).is_none());
        assert_eq!(scene.entity_position(b), Some(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn autopilot_moves_the_local_player() {
        let mut scene = HeadlessScene::new();
        let start = scene.local_position();
        scene.autopilot_step(0.1);
        assert_ne!(scene.local_position(), start);
    }
}
