//! Math types.
//!
//! This module intentionally stays small and deterministic.
//! Positions on the wire are plain `{x, y}` objects.

use serde::{Deserialize, Serialize};

/// 2D vector / position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    /// Steps from `self` toward `target` by at most `max_delta`.
    ///
    /// Never overshoots: once the remaining distance is within `max_delta`,
    /// the result is `target` exactly.
    pub fn move_towards(self, target: Self, max_delta: f32) -> Self {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq == 0.0 || dist_sq <= max_delta * max_delta {
            return target;
        }
        let dist = dist_sq.sqrt();
        Self::new(
            self.x + dx / dist * max_delta,
            self.y + dy / dist * max_delta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_lerp_midpoint() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(2.0, 4.0);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn vec2_move_towards_steps_and_arrives() {
        let from = Vec2::ZERO;
        let to = Vec2::new(3.0, 4.0);

        let step = from.move_towards(to, 1.0);
        assert_eq!(step, Vec2::new(0.6, 0.8));

        // A step larger than the remaining distance lands exactly on target.
        assert_eq!(step.move_towards(to, 10.0), to);
        assert_eq!(to.move_towards(to, 1.0), to);
    }
}
