//! Grounded-state detection.
//!
//! Rapier integrates in discrete steps, so the "bottom contact" signal flickers
//! for a frame or two when the player lands, walks across a platform seam or
//! sits on a platform that the one-way filter is re-evaluating.  The detector
//! turns the raw per-frame signals into a stable `is_grounded` flag with a small
//! hysteresis state machine:
//!
//! ```text
//!                fast fall (> fast_fall_threshold)
//!        ┌────────────────────────────────────────────┐
//!        ▼                                            │
//!   ┌─────────┐  contact × grounded_min_frames   ┌──────────┐
//!   │ Airborne│ ───────────────────────────────▶ │ Grounded │
//!   └─────────┘ ◀─────────────────────────────── └──────────┘
//!        no contact and |fall_speed| ≥ retain       │   ▲
//!                                                   └───┘
//!                        no contact but |fall_speed| < retain
//! ```
//!
//! The same detector gates the jump impulse and cosmetic pixel snapping.

use crate::config::{GameConfig, GroundedStrategy};
use bevy::prelude::*;

/// Raw per-frame contact signals for one body.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundSignals {
    /// A bottom-face contact against anything solid this frame.
    pub touching_down: bool,
    /// A bottom-face contact against the immovable ground.
    pub blocked_down: bool,
    /// Vertical speed, positive while falling.
    pub fall_speed: f32,
}

/// Thresholds consumed by [`GroundedDetector::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundedThresholds {
    pub ground_velocity: f32,
    pub retain_velocity: f32,
    pub fast_fall: f32,
    pub min_frames: u32,
}

impl GroundedThresholds {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            ground_velocity: config.ground_velocity_threshold,
            retain_velocity: config.grounded_retain_velocity,
            fast_fall: config.fast_fall_threshold,
            min_frames: config.grounded_min_frames,
        }
    }
}

impl Default for GroundedThresholds {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Stabilized grounded state attached to the player.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundedDetector {
    pub is_grounded: bool,
    pub consecutive_grounded_frames: u32,
}

impl GroundedDetector {
    /// Advance the hysteresis state machine by one frame and return the new
    /// grounded flag.
    pub fn update(&mut self, signals: GroundSignals, t: GroundedThresholds) -> bool {
        let was_grounded = self.is_grounded;
        let speed = signals.fall_speed.abs();

        if signals.fall_speed > t.fast_fall {
            self.force_airborne();
            return false;
        }

        let definitely_on_ground =
            signals.blocked_down || (signals.touching_down && speed < t.ground_velocity);

        if definitely_on_ground {
            self.consecutive_grounded_frames = self.consecutive_grounded_frames.saturating_add(1);
            self.is_grounded = self.consecutive_grounded_frames >= t.min_frames || was_grounded;
        } else if was_grounded && speed < t.retain_velocity {
            self.is_grounded = true;
            self.consecutive_grounded_frames = self.consecutive_grounded_frames.min(t.min_frames);
        } else {
            self.force_airborne();
        }

        self.is_grounded
    }

    /// Single-frame classifier with no memory.
    pub fn classify_contact_only(&mut self, signals: GroundSignals, t: GroundedThresholds) -> bool {
        let grounded = signals.touching_down
            || (signals.blocked_down && signals.fall_speed.abs() < t.ground_velocity);
        self.is_grounded = grounded;
        self.consecutive_grounded_frames = if grounded {
            self.consecutive_grounded_frames.saturating_add(1)
        } else {
            0
        };
        grounded
    }

    /// Dispatch to the configured strategy.
    pub fn step(
        &mut self,
        strategy: GroundedStrategy,
        signals: GroundSignals,
        t: GroundedThresholds,
    ) -> bool {
        match strategy {
            GroundedStrategy::Hysteresis => self.update(signals, t),
            GroundedStrategy::ContactOnly => self.classify_contact_only(signals, t),
        }
    }

    /// Drop to airborne immediately (jump start, fast fall).
    pub fn force_airborne(&mut self) {
        self.is_grounded = false;
        self.consecutive_grounded_frames = 0;
    }

    /// Assert grounded immediately (platform stabilization snap).
    pub fn force_grounded(&mut self, min_frames: u32) {
        self.is_grounded = true;
        self.consecutive_grounded_frames = self.consecutive_grounded_frames.max(min_frames);
    }
}
