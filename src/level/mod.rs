//! Level lifecycle: build, play, goal reached, teardown and rebuild.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`progress`] | `ProgressState` resource: level number, banana count, height record |
//! | [`spawn`] | Platform footprints, `build_level` / `teardown_level`, session bodies |
//! | [`lifecycle`] | Systems driving `LevelPhase` and reacting to sensor overlaps |
//!
//! ## Phases
//!
//! ```text
//! Building ──goal of current level exists──▶ Active ──goal overlap──▶ GoalReached
//!    ▲                                                                    │
//!    └──────────────── next level queued (same command batch) ◀───────────┤
//!                                                                         ▼
//!                                              past last level ──▶ SessionComplete
//! ```

pub mod lifecycle;
pub mod progress;
pub mod spawn;

pub use lifecycle::{
    cleanup_session, collectible_contact_system, goal_contact_system, height_tracking_system,
    level_advance_system, level_ready_system, start_session, sync_viewport_system,
};
pub use progress::{LevelAdvance, ProgressState};
pub use spawn::{build_level, spawn_session_world, teardown_level, BuiltLevel, Footprint};

use crate::config::GameConfig;
use crate::menu::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Tag for every entity owned by one level.  Removed on advance or session end.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelEntity {
    pub level: u32,
}

/// Tag for entities that live for a whole play session (player, ground, walls, HUD).
#[derive(Component)]
pub struct SessionEntity;

/// One-way platform body.
#[derive(Component)]
pub struct Platform;

/// World-space walkable surface of a platform.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlatformFootprint {
    pub center_x: f32,
    pub half_width: f32,
    /// World Y of the top of the collision box.
    pub top: f32,
}

impl PlatformFootprint {
    #[inline]
    pub fn left(&self) -> f32 {
        self.center_x - self.half_width
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center_x + self.half_width
    }
}

/// Banana pickup.  `collected` flips once; later overlaps are ignored.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Collectible {
    pub collected: bool,
}

/// The level's goal sensor.
#[derive(Component, Debug, Clone, Copy)]
pub struct Goal {
    pub level: u32,
}

#[derive(Component)]
pub struct LevelBackground;

#[derive(Component)]
pub struct GroundSkin;

/// The immovable ground slab.  Contacts with it set `blocked_down`.
#[derive(Component)]
pub struct Ground;

#[derive(Component)]
pub struct Wall;

// ── Resources ──────────────────────────────────────────────────────────────────

/// Where the level lifecycle currently stands.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPhase {
    #[default]
    Building,
    Active,
    GoalReached,
    SessionComplete,
}

/// Viewport size used to resolve platform X and centre the camera.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            width: config.viewport_width,
            height: config.viewport_height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelPhase>()
            .init_resource::<ProgressState>()
            .init_resource::<Viewport>()
            .add_systems(
                OnEnter(GameState::Playing),
                (sync_viewport_system, start_session).chain(),
            )
            .add_systems(
                Update,
                (level_ready_system, height_tracking_system)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                PostUpdate,
                (
                    collectible_contact_system,
                    goal_contact_system,
                    level_advance_system,
                )
                    .chain()
                    .after(PhysicsSet::Writeback)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Playing), cleanup_session);
    }
}
