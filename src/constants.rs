//! Centralised gameplay and physics constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig`] mirrors most of them and can override any
//! subset at startup from `assets/game.toml`.
//!
//! ## Units and axes
//!
//! Distances are world pixels (`pixels_per_meter(1.0)` keeps Rapier units equal
//! to pixels).  The world is y-up: the ground line sits at [`GROUND_Y`] and
//! platforms are placed *above* it.  Velocities are pixels per second.

// ── Viewport / World ──────────────────────────────────────────────────────────

/// Viewport width used before the primary window reports its real size, and by
/// headless tests.
pub const VIEWPORT_WIDTH: f32 = 1280.0;

/// Viewport height used before the primary window reports its real size.
pub const VIEWPORT_HEIGHT: f32 = 720.0;

/// World height expressed as a multiple of the viewport height.
///
/// At 10 × 720 the climbable column is 7 200 px tall, comfortably above the
/// tallest baked goal (3 000 px).
pub const WORLD_HEIGHT_MULTIPLIER: f32 = 10.0;

/// World-space Y of the ground line (top surface of the ground collider).
pub const GROUND_Y: f32 = 0.0;

/// Thickness of the ground slab below the ground line.
pub const GROUND_HEIGHT: f32 = 50.0;

/// Thickness of the invisible side walls that keep the player in the column.
pub const WALL_THICKNESS: f32 = 40.0;

/// Height of the player's spawn point above the ground line.
pub const PLAYER_START_OFFSET: f32 = 120.0;

/// Pixels per displayed "meter" on the height HUD.
pub const METERS_DIVISOR: f32 = 10.0;

// ── Physics ───────────────────────────────────────────────────────────────────

/// World gravity magnitude (px/s², applied downward).
pub const WORLD_GRAVITY: f32 = 800.0;

// ── Player: Movement ──────────────────────────────────────────────────────────

/// Horizontal speed while left/right is held (px/s).
pub const PLAYER_SPEED: f32 = 300.0;

/// Upward velocity applied by a jump (px/s).
///
/// With the combined 1 600 px/s² gravity the apex is ≈ 610 px, roughly two
/// platform rows.  Baked levels space rows 300 px apart so every jump has
/// generous slack for small children.
pub const PLAYER_JUMP_POWER: f32 = 1400.0;

/// Extra gravity applied to the player body on top of [`WORLD_GRAVITY`].
///
/// Converted into a Rapier `GravityScale` of `(WORLD + PLAYER) / WORLD`.
pub const PLAYER_GRAVITY: f32 = 800.0;

/// Restitution of the player body.  Small so landings do not visibly bounce.
pub const PLAYER_BOUNCE: f32 = 0.1;

/// Horizontal speed cap (px/s).
pub const PLAYER_MAX_VELOCITY_X: f32 = 500.0;

/// Vertical speed cap (px/s), applied in both directions.
pub const PLAYER_MAX_VELOCITY_Y: f32 = 1500.0;

/// Per-frame multiplier applied to horizontal velocity when no direction is held.
/// 0.8 stops a full-speed walk in roughly a quarter second.
pub const PLAYER_FRICTION: f32 = 0.8;

/// Visual sprite size.
pub const PLAYER_WIDTH: f32 = 80.0;
pub const PLAYER_HEIGHT: f32 = 100.0;

/// Collision box size; slightly smaller than the sprite and centred on it.
pub const PLAYER_BODY_WIDTH: f32 = 70.0;
pub const PLAYER_BODY_HEIGHT: f32 = 90.0;

/// Below this horizontal speed a grounded player is shown idle.
pub const IDLE_VELOCITY_THRESHOLD: f32 = 10.0;

// ── Grounded Detection ────────────────────────────────────────────────────────

/// A contact counts as "definitely on the ground" only while the vertical speed
/// magnitude is below this value (px/s).
pub const GROUND_VELOCITY_THRESHOLD: f32 = 5.0;

/// A previously grounded player stays grounded without a fresh contact while
/// its vertical speed magnitude stays below this value (px/s).
///
/// One 60 Hz frame of free fall at 1 600 px/s² adds ≈ 27 px/s, so walking off a
/// ledge clears this within a single frame.
pub const GROUNDED_RETAIN_VELOCITY: f32 = 20.0;

/// Falling faster than this (px/s) is never grounded, whatever the contact
/// flags say.
pub const FAST_FALL_THRESHOLD: f32 = 100.0;

/// Consecutive grounded classifications required before asserting grounded
/// from an airborne state.
pub const GROUNDED_MIN_FRAMES: u32 = 2;

/// Minimum downward component of a contact normal for the contact to count as
/// "under the feet".  Side contacts with walls stay well below this.
pub const GROUND_NORMAL_MIN_DOT: f32 = 0.7;

// ── Platform Stabilization ────────────────────────────────────────────────────

/// Slow-fall window (px/s) in which the player is snapped onto a platform top.
pub const STABILIZATION_MAX_FALL_SPEED: f32 = 10.0;

/// Player bottom may sit this far above a platform top and still be snapped.
pub const STABILIZATION_ABOVE_TOLERANCE: f32 = 2.0;

/// Player bottom may sit this far below a platform top and still be snapped.
pub const STABILIZATION_BELOW_TOLERANCE: f32 = 5.0;

/// Gap left between the snapped player bottom and the platform top.
pub const STABILIZATION_CLEARANCE: f32 = 0.5;

// ── Platforms ─────────────────────────────────────────────────────────────────

/// Unscaled width for each width-class (0..=5).
pub const PLATFORM_WIDTHS: [f32; 6] = [250.0, 280.0, 310.0, 340.0, 370.0, 400.0];

/// Unscaled thickness of the walkable grass strip.
pub const PLATFORM_GRASS_HEIGHT: f32 = 20.0;

/// Unscaled thickness of the dirt below the grass.
pub const PLATFORM_DIRT_HEIGHT: f32 = 30.0;

/// Shared visual scale for platform sprites and footprints.
pub const PLATFORM_SCALE: f32 = 1.3;

/// Fraction of the visual width covered by the collision box.
pub const PLATFORM_COLLISION_WIDTH_FACTOR: f32 = 0.95;

// ── Collectibles ──────────────────────────────────────────────────────────────

/// Unscaled banana size.
pub const COLLECTIBLE_WIDTH: f32 = 40.0;
pub const COLLECTIBLE_HEIGHT: f32 = 60.0;

/// Visual scale of a banana.
pub const COLLECTIBLE_SCALE: f32 = 1.2;

/// Fraction of the visual size covered by the pickup sensor.
pub const COLLECTIBLE_COLLISION_FACTOR: f32 = 0.8;

/// Height of the banana centre above its platform's top surface.
pub const COLLECTIBLE_OFFSET_FROM_PLATFORM: f32 = 30.0;

/// Probability that a flagged platform actually spawns its banana.
///
/// 1.0 makes the level data authoritative.  Earlier builds rolled against a
/// 0.3 rejection threshold (≈ 70 % spawn rate); set 0.7 to reproduce that.
pub const COLLECTIBLE_SPAWN_CHANCE: f32 = 1.0;

// ── Goal ──────────────────────────────────────────────────────────────────────

/// Default goal height above the ground line for every baked level.
pub const LEVEL_GOAL_HEIGHT: f32 = 3000.0;

/// Visual size of the goal pennant.
pub const GOAL_SIZE: f32 = 150.0;

/// Side of the goal's square sensor; larger than the visual so small children
/// touch it easily.
pub const GOAL_COLLISION_SIZE: f32 = 200.0;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Fraction of the remaining distance the camera closes each frame.
pub const CAMERA_FOLLOW_LERP: f32 = 0.1;

/// Camera target sits this far above the player so upcoming platforms are visible.
pub const CAMERA_FOLLOW_OFFSET: f32 = 144.0;

// ── Render Depth ──────────────────────────────────────────────────────────────

pub const Z_BACKGROUND: f32 = -10.0;
pub const Z_GROUND: f32 = 4.0;
pub const Z_PLATFORM: f32 = 5.0;
pub const Z_COLLECTIBLE: f32 = 6.0;
pub const Z_PLAYER: f32 = 10.0;
pub const Z_GOAL: f32 = 15.0;
