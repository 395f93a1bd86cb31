//! Per-session progress: level number, banana count and height record.

use super::Collectible;
use bevy::prelude::*;

/// Result of advancing past a reached goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAdvance {
    /// Build this level next.
    Next(u32),
    /// The last catalog level was cleared.
    SessionComplete,
}

/// Progress for one play session.
///
/// `current_level` only grows, `collectibles_collected` never drops within a
/// session, and `max_height_reached` is a running maximum that resets to the
/// spawn height whenever a new level starts.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub current_level: u32,
    pub collectibles_collected: u32,
    /// Highest world Y the player has reached on this level.
    pub max_height_reached: f32,
    /// Height record above the ground line, in HUD meters.
    pub meters_climbed: u32,
}

impl ProgressState {
    pub fn new(start_level: u32, spawn_y: f32) -> Self {
        Self {
            current_level: start_level.max(1),
            collectibles_collected: 0,
            max_height_reached: spawn_y,
            meters_climbed: 0,
        }
    }

    /// Fold a new player height into the record.  Returns `true` on a new record.
    pub fn record_height(&mut self, y: f32, ground_y: f32, meters_divisor: f32) -> bool {
        if y <= self.max_height_reached {
            return false;
        }
        self.max_height_reached = y;
        let meters = ((y - ground_y) / meters_divisor).floor();
        self.meters_climbed = if meters > 0.0 { meters as u32 } else { 0 };
        true
    }

    /// Count a collectible exactly once.  Returns `false` if it was already taken.
    pub fn collect_once(&mut self, collectible: &mut Collectible) -> bool {
        if collectible.collected {
            return false;
        }
        collectible.collected = true;
        self.collectibles_collected = self.collectibles_collected.saturating_add(1);
        true
    }

    /// Step to the next level.  Past the end of the catalog the session is over.
    pub fn advance(&mut self, catalog_len: usize) -> LevelAdvance {
        self.current_level = self.current_level.saturating_add(1);
        if self.current_level as usize > catalog_len {
            LevelAdvance::SessionComplete
        } else {
            LevelAdvance::Next(self.current_level)
        }
    }

    /// Start a fresh height record from the spawn point.
    pub fn reset_height(&mut self, spawn_y: f32) {
        self.max_height_reached = spawn_y;
        self.meters_climbed = 0;
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new(1, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_record_only_moves_up() {
        let mut p = ProgressState::new(1, 120.0);
        assert!(p.record_height(455.0, 0.0, 10.0));
        assert_eq!(p.meters_climbed, 45);
        assert!(!p.record_height(300.0, 0.0, 10.0));
        assert_eq!(p.max_height_reached, 455.0);
        assert_eq!(p.meters_climbed, 45);
    }

    #[test]
    fn collect_once_counts_a_single_time() {
        let mut p = ProgressState::default();
        let mut banana = Collectible::default();
        assert!(p.collect_once(&mut banana));
        assert!(!p.collect_once(&mut banana));
        assert_eq!(p.collectibles_collected, 1);
    }

    #[test]
    fn advance_walks_the_catalog_then_completes() {
        let mut p = ProgressState::new(9, 120.0);
        assert_eq!(p.advance(10), LevelAdvance::Next(10));
        assert_eq!(p.advance(10), LevelAdvance::SessionComplete);
        assert_eq!(p.current_level, 11);
    }

    #[test]
    fn reset_height_keeps_bananas() {
        let mut p = ProgressState::new(1, 120.0);
        p.collectibles_collected = 4;
        p.record_height(2000.0, 0.0, 10.0);
        p.reset_height(120.0);
        assert_eq!(p.meters_climbed, 0);
        assert_eq!(p.max_height_reached, 120.0);
        assert_eq!(p.collectibles_collected, 4);
    }

    #[test]
    fn start_level_zero_is_clamped() {
        assert_eq!(ProgressState::new(0, 0.0).current_level, 1);
    }
}
