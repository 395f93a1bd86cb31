//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::control`]: input, movement, animation, pixel snapping
//! - [`super::sensing`]: contact signals, grounded detection, stabilization

use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player body entity.
#[derive(Component)]
pub struct Player;

/// Marker for the child entity that carries the player sprite.
///
/// Pixel snapping moves this child, never the physics body.
#[derive(Component)]
pub struct PlayerVisual;

/// Horizontal facing of the character.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Animation state derived from velocity and grounded state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerAnimation {
    #[default]
    Idle,
    Walking,
    Jumping,
}

/// Jump input level seen on the previous frame; used to detect the rising edge.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct JumpEdge {
    pub was_held: bool,
}

impl JumpEdge {
    /// Record the current level and report whether this frame is a rising edge.
    pub fn rising(&mut self, held: bool) -> bool {
        let edge = held && !self.was_held;
        self.was_held = held;
        edge
    }
}

// ── Input Abstraction ──────────────────────────────────────────────────────────

/// Digital player intent for the current frame.
///
/// [`super::control::keyboard_to_intent_system`] rewrites it every frame;
/// [`super::control::apply_player_intent_system`] consumes it.  Tests populate
/// it directly to drive the character without a keyboard.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerIntent {
    pub left: bool,
    pub right: bool,
    /// Jump input level (held), not the edge.
    pub jump_held: bool,
}

impl PlayerIntent {
    /// -1, 0 or +1.  Left takes priority when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_edge_fires_once_per_press() {
        let mut edge = JumpEdge::default();
        assert!(edge.rising(true));
        assert!(!edge.rising(true));
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
    }

    #[test]
    fn left_wins_when_both_held() {
        let intent = PlayerIntent {
            left: true,
            right: true,
            jump_held: false,
        };
        assert_eq!(intent.horizontal(), -1.0);
    }
}
