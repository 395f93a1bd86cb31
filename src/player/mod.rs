//! Player module: character entity, input handling, grounded sensing.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | ECS components (`Player`, `PlayerVisual`, `Facing`, `PlayerAnimation`, `JumpEdge`) and the `PlayerIntent` resource |
//! | [`control`] | Input → intent, horizontal movement, jump, velocity clamp, animation, pixel snapping |
//! | [`sensing`] | Contact signals from Rapier, grounded detection, platform stabilization |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod control;
pub mod sensing;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use control::{
    animation_state_system, apply_player_intent_system, clamp_velocity_system,
    keyboard_to_intent_system, pixel_snap_system,
};
pub use sensing::{
    ground_contact_sensing_system, grounded_detection_system, platform_stabilization_system,
};
pub use state::{Facing, JumpEdge, Player, PlayerAnimation, PlayerIntent, PlayerVisual};

use crate::config::GameConfig;
use crate::constants::{PLAYER_HEIGHT, PLAYER_WIDTH, Z_PLAYER};
use crate::grounded::{GroundSignals, GroundedDetector};
use crate::menu::GameState;
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy_rapier2d::prelude::*;

/// Registers player input, sensing and movement systems.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerIntent>()
            .add_systems(
                Update,
                (
                    keyboard_to_intent_system,
                    ground_contact_sensing_system,
                    grounded_detection_system,
                    platform_stabilization_system,
                    apply_player_intent_system,
                    clamp_velocity_system,
                    animation_state_system,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                PostUpdate,
                pixel_snap_system
                    .after(PhysicsSet::Writeback)
                    .before(TransformSystems::Propagate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Character spawn ────────────────────────────────────────────────────────────

/// Spawn the player character at `position`.
///
/// The body is a rotation-locked dynamic cuboid slightly smaller than the
/// sprite.  The sprite lives on a [`PlayerVisual`] child so pixel snapping can
/// offset it without moving the body.  Rapier has no per-body speed limit, so
/// [`clamp_velocity_system`] bounds the velocity instead.
pub fn spawn_player(commands: &mut Commands, config: &GameConfig, position: Vec2) -> Entity {
    let player = commands
        .spawn((
            (
                Player,
                GroundSignals::default(),
                GroundedDetector::default(),
                JumpEdge::default(),
                Facing::default(),
                PlayerAnimation::default(),
            ),
            // Physics
            RigidBody::Dynamic,
            Collider::cuboid(config.player_body_width * 0.5, config.player_body_height * 0.5),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            GravityScale(config.player_gravity_scale()),
            Restitution::coefficient(config.player_bounce),
            Friction::coefficient(0.0),
            Ccd::enabled(),
            ActiveEvents::COLLISION_EVENTS,
            // Transform / visibility
            Transform::from_translation(position.extend(Z_PLAYER)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                PlayerVisual,
                Sprite::from_color(
                    Color::srgb(0.55, 0.35, 0.17),
                    Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                ),
                Transform::default(),
            ));
        })
        .id();

    info!("Player spawned at ({:.0}, {:.0})", position.x, position.y);
    player
}

/// Put the player back at `position` with no motion and an airborne detector.
pub fn reset_player(
    transform: &mut Transform,
    velocity: &mut Velocity,
    detector: &mut GroundedDetector,
    position: Vec2,
) {
    transform.translation.x = position.x;
    transform.translation.y = position.y;
    *velocity = Velocity::zero();
    detector.force_airborne();
}
