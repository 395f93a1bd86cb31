//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the constants in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.player_speed`, `config.grounded_min_frames`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{validate_positive, validate_unit_interval, GameError, GameResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Which grounded classifier drives jumping and pixel snapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundedStrategy {
    /// Multi-frame hysteresis state machine (see [`crate::grounded`]).
    #[default]
    Hysteresis,
    /// Single-frame contact classifier with no memory.
    ContactOnly,
}

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Viewport / World ─────────────────────────────────────────────────────
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub world_height_multiplier: f32,
    pub ground_y: f32,
    pub ground_height: f32,
    pub player_start_offset: f32,
    pub meters_divisor: f32,

    // ── Physics ──────────────────────────────────────────────────────────────
    pub world_gravity: f32,

    // ── Player: Movement ─────────────────────────────────────────────────────
    pub player_speed: f32,
    pub player_jump_power: f32,
    pub player_gravity: f32,
    pub player_bounce: f32,
    pub player_max_velocity_x: f32,
    pub player_max_velocity_y: f32,
    pub player_friction: f32,
    pub player_body_width: f32,
    pub player_body_height: f32,
    pub idle_velocity_threshold: f32,

    // ── Grounded Detection ───────────────────────────────────────────────────
    pub grounded_strategy: GroundedStrategy,
    pub ground_velocity_threshold: f32,
    pub grounded_retain_velocity: f32,
    pub fast_fall_threshold: f32,
    pub grounded_min_frames: u32,

    // ── Platform Stabilization ───────────────────────────────────────────────
    pub stabilization_max_fall_speed: f32,
    pub stabilization_above_tolerance: f32,
    pub stabilization_below_tolerance: f32,

    // ── Platforms ────────────────────────────────────────────────────────────
    pub platform_grass_height: f32,
    pub platform_dirt_height: f32,
    pub platform_scale: f32,
    pub platform_collision_width_factor: f32,

    // ── Collectibles ─────────────────────────────────────────────────────────
    pub collectible_offset: f32,
    pub collectible_spawn_chance: f32,

    // ── Goal ─────────────────────────────────────────────────────────────────
    pub goal_size: f32,
    pub goal_collision_size: f32,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub camera_follow_lerp: f32,
    pub camera_follow_offset: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Viewport / World
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            world_height_multiplier: WORLD_HEIGHT_MULTIPLIER,
            ground_y: GROUND_Y,
            ground_height: GROUND_HEIGHT,
            player_start_offset: PLAYER_START_OFFSET,
            meters_divisor: METERS_DIVISOR,
            // Physics
            world_gravity: WORLD_GRAVITY,
            // Player: Movement
            player_speed: PLAYER_SPEED,
            player_jump_power: PLAYER_JUMP_POWER,
            player_gravity: PLAYER_GRAVITY,
            player_bounce: PLAYER_BOUNCE,
            player_max_velocity_x: PLAYER_MAX_VELOCITY_X,
            player_max_velocity_y: PLAYER_MAX_VELOCITY_Y,
            player_friction: PLAYER_FRICTION,
            player_body_width: PLAYER_BODY_WIDTH,
            player_body_height: PLAYER_BODY_HEIGHT,
            idle_velocity_threshold: IDLE_VELOCITY_THRESHOLD,
            // Grounded Detection
            grounded_strategy: GroundedStrategy::default(),
            ground_velocity_threshold: GROUND_VELOCITY_THRESHOLD,
            grounded_retain_velocity: GROUNDED_RETAIN_VELOCITY,
            fast_fall_threshold: FAST_FALL_THRESHOLD,
            grounded_min_frames: GROUNDED_MIN_FRAMES,
            // Platform Stabilization
            stabilization_max_fall_speed: STABILIZATION_MAX_FALL_SPEED,
            stabilization_above_tolerance: STABILIZATION_ABOVE_TOLERANCE,
            stabilization_below_tolerance: STABILIZATION_BELOW_TOLERANCE,
            // Platforms
            platform_grass_height: PLATFORM_GRASS_HEIGHT,
            platform_dirt_height: PLATFORM_DIRT_HEIGHT,
            platform_scale: PLATFORM_SCALE,
            platform_collision_width_factor: PLATFORM_COLLISION_WIDTH_FACTOR,
            // Collectibles
            collectible_offset: COLLECTIBLE_OFFSET_FROM_PLATFORM,
            collectible_spawn_chance: COLLECTIBLE_SPAWN_CHANCE,
            // Goal
            goal_size: GOAL_SIZE,
            goal_collision_size: GOAL_COLLISION_SIZE,
            // Camera
            camera_follow_lerp: CAMERA_FOLLOW_LERP,
            camera_follow_offset: CAMERA_FOLLOW_OFFSET,
        }
    }
}

impl GameConfig {
    /// World-space Y of the player's spawn point.
    #[inline]
    pub fn spawn_y(&self) -> f32 {
        self.ground_y + self.player_start_offset
    }

    /// Total world height above the ground line.
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.viewport_height * self.world_height_multiplier
    }

    /// Rapier `GravityScale` that yields `world_gravity + player_gravity` on the player.
    #[inline]
    pub fn player_gravity_scale(&self) -> f32 {
        (self.world_gravity + self.player_gravity) / self.world_gravity
    }

    /// Reject values that would break the simulation or the HUD.
    pub fn validate(&self) -> GameResult<()> {
        validate_positive("viewport_width", self.viewport_width)?;
        validate_positive("viewport_height", self.viewport_height)?;
        validate_positive("world_height_multiplier", self.world_height_multiplier)?;
        validate_positive("meters_divisor", self.meters_divisor)?;
        validate_positive("world_gravity", self.world_gravity)?;
        validate_positive("player_speed", self.player_speed)?;
        validate_positive("player_jump_power", self.player_jump_power)?;
        validate_positive("player_body_width", self.player_body_width)?;
        validate_positive("player_body_height", self.player_body_height)?;
        validate_positive("platform_scale", self.platform_scale)?;
        validate_positive("goal_collision_size", self.goal_collision_size)?;
        validate_unit_interval("player_friction", self.player_friction)?;
        validate_unit_interval("player_bounce", self.player_bounce)?;
        validate_unit_interval("collectible_spawn_chance", self.collectible_spawn_chance)?;
        validate_unit_interval(
            "platform_collision_width_factor",
            self.platform_collision_width_factor,
        )?;
        if self.player_gravity < 0.0 {
            return Err(GameError::UnsafeConstant {
                name: "player_gravity",
                value: self.player_gravity,
                safe_range: "[0.0, ∞)",
            });
        }
        if self.grounded_retain_velocity < self.ground_velocity_threshold {
            return Err(GameError::UnsafeConstant {
                name: "grounded_retain_velocity",
                value: self.grounded_retain_velocity,
                safe_range: "[ground_velocity_threshold, ∞)",
            });
        }
        if self.fast_fall_threshold <= self.grounded_retain_velocity {
            return Err(GameError::UnsafeConstant {
                name: "fast_fall_threshold",
                value: self.fast_fall_threshold,
                safe_range: "(grounded_retain_velocity, ∞)",
            });
        }
        Ok(())
    }
}

/// Parse and validate a TOML document into a [`GameConfig`].
pub fn parse_game_config(contents: &str) -> GameResult<GameConfig> {
    let loaded = toml::from_str::<GameConfig>(contents).map_err(|e| GameError::ConfigParse {
        message: e.to_string(),
    })?;
    loaded.validate()?;
    Ok(loaded)
}

/// Default location of the config file, relative to the working directory.
pub const GAME_CONFIG_PATH: &str = "assets/game.toml";

/// Read and validate the config at `path`.  `Ok(None)` when the file is absent.
pub fn read_game_config(path: &str) -> GameResult<Option<GameConfig>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_game_config(&contents).map(Some),
        Err(_) => Ok(None),
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse or validation errors
/// are logged but do not abort the game.  A missing file is not an error.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    match read_game_config(GAME_CONFIG_PATH) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded game config from {GAME_CONFIG_PATH}");
        }
        Ok(None) => {
            info!("No {GAME_CONFIG_PATH} found; using compiled defaults");
        }
        Err(e) => {
            warn!("Failed to load {GAME_CONFIG_PATH}: {e}; using defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = parse_game_config("player_speed = 250.0\n").expect("valid partial config");
        assert_eq!(cfg.player_speed, 250.0);
        assert_eq!(cfg.player_jump_power, PLAYER_JUMP_POWER);
    }

    #[test]
    fn strategy_parses_snake_case() {
        let cfg = parse_game_config("grounded_strategy = \"contact_only\"\n")
            .expect("valid strategy");
        assert_eq!(cfg.grounded_strategy, GroundedStrategy::ContactOnly);
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        assert!(matches!(
            parse_game_config("collectible_spawn_chance = 1.5\n"),
            Err(GameError::UnsafeConstant { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            parse_game_config("player_speed = \"fast\"\n"),
            Err(GameError::ConfigParse { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("banana_party_no_such_config.toml");
        let result = read_game_config(path.to_str().expect("utf-8 temp path"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn broken_file_is_reported() {
        let path = std::env::temp_dir().join("banana_party_broken_config.toml");
        std::fs::write(&path, "player_speed = [").expect("write temp config");
        let result = read_game_config(path.to_str().expect("utf-8 temp path"));
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(GameError::ConfigParse { .. })));
    }

    #[test]
    fn startup_system_leaves_a_valid_config() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameConfig::default());
        app.add_systems(Startup, load_game_config);
        app.update();
        assert!(app.world().resource::<GameConfig>().validate().is_ok());
    }

    #[test]
    fn default_gravity_scale_doubles_world_gravity() {
        let cfg = GameConfig::default();
        assert!((cfg.player_gravity_scale() - 2.0).abs() < 1e-6);
    }
}
