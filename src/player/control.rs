//! Player input and movement systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`keyboard_to_intent_system`]: arrow keys / WASD / Space into [`PlayerIntent`].
//! 2. Grounded sensing (see [`super::sensing`]).
//! 3. [`apply_player_intent_system`]: horizontal velocity, friction, jump impulse, facing.
//! 4. [`clamp_velocity_system`]: bound the body's speed on both axes.
//! 5. [`animation_state_system`]: pick Idle / Walking / Jumping and flip the sprite.
//!
//! [`pixel_snap_system`] runs in `PostUpdate` once Rapier has written back the
//! new body positions.
//!
//! The movement rules are plain functions ([`step_horizontal`], [`next_animation`],
//! [`pixel_snap_offset`]) so they are tested without an `App`.

use super::state::{Facing, JumpEdge, Player, PlayerAnimation, PlayerIntent, PlayerVisual};
use crate::config::GameConfig;
use crate::grounded::GroundedDetector;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Pure rules ────────────────────────────────────────────────────────────────

/// New horizontal velocity for one frame.
///
/// A held direction sets the velocity outright; no direction decays it by
/// `friction`.
#[inline]
pub fn step_horizontal(vx: f32, direction: f32, speed: f32, friction: f32) -> f32 {
    if direction != 0.0 {
        direction * speed
    } else {
        vx * friction
    }
}

/// Animation for the current frame.
pub fn next_animation(grounded: bool, vx: f32, idle_threshold: f32) -> PlayerAnimation {
    if !grounded {
        PlayerAnimation::Jumping
    } else if vx.abs() < idle_threshold {
        PlayerAnimation::Idle
    } else {
        PlayerAnimation::Walking
    }
}

/// Offset that moves a visual at `body` onto the nearest whole pixel.
#[inline]
pub fn pixel_snap_offset(body: Vec2) -> Vec2 {
    body.round() - body
}

// ── Step 1: Keyboard → Intent ────────────────────────────────────────────────

/// Translate the four-direction digital control into [`PlayerIntent`].
///
/// - **Left / A** → `left`
/// - **Right / D** → `right`
/// - **Up / W / Space** → `jump_held`
pub fn keyboard_to_intent_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent {
        left: keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
        right: keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
        jump_held: keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW, KeyCode::Space]),
    };
}

// ── Step 3: Intent → Velocity ────────────────────────────────────────────────

/// Apply [`PlayerIntent`] to the player's `Velocity`.
///
/// The jump fires only on the rising edge of `jump_held` and only while the
/// detector reports grounded.  Jumping drops the detector to airborne at once
/// so the same press can never re-trigger on the next frame.
pub fn apply_player_intent_system(
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    mut q: Query<
        (
            &mut Velocity,
            &mut GroundedDetector,
            &mut JumpEdge,
            &mut Facing,
        ),
        With<Player>,
    >,
) {
    let Ok((mut velocity, mut grounded, mut edge, mut facing)) = q.single_mut() else {
        return;
    };

    let direction = intent.horizontal();
    velocity.linvel.x = step_horizontal(
        velocity.linvel.x,
        direction,
        config.player_speed,
        config.player_friction,
    );
    if direction < 0.0 {
        *facing = Facing::Left;
    } else if direction > 0.0 {
        *facing = Facing::Right;
    }

    if edge.rising(intent.jump_held) && grounded.is_grounded {
        velocity.linvel.y = config.player_jump_power;
        grounded.force_airborne();
        debug!("Jump at vy = {}", config.player_jump_power);
    }
}

// ── Step 4: Velocity bounds ──────────────────────────────────────────────────

/// Clamp the player's linear velocity to the configured maxima.
pub fn clamp_velocity_system(
    config: Res<GameConfig>,
    mut q: Query<&mut Velocity, With<Player>>,
) {
    for mut velocity in q.iter_mut() {
        velocity.linvel.x = velocity
            .linvel
            .x
            .clamp(-config.player_max_velocity_x, config.player_max_velocity_x);
        velocity.linvel.y = velocity
            .linvel
            .y
            .clamp(-config.player_max_velocity_y, config.player_max_velocity_y);
    }
}

// ── Step 5: Animation ────────────────────────────────────────────────────────

/// Update [`PlayerAnimation`] and mirror the sprite to match [`Facing`].
pub fn animation_state_system(
    config: Res<GameConfig>,
    mut q_player: Query<
        (&Velocity, &GroundedDetector, &Facing, &mut PlayerAnimation, &Children),
        With<Player>,
    >,
    mut q_visual: Query<&mut Sprite, With<PlayerVisual>>,
) {
    let Ok((velocity, grounded, facing, mut animation, children)) = q_player.single_mut() else {
        return;
    };

    let next = next_animation(
        grounded.is_grounded,
        velocity.linvel.x,
        config.idle_velocity_threshold,
    );
    if *animation != next {
        *animation = next;
    }

    for child in children.iter() {
        if let Ok(mut sprite) = q_visual.get_mut(child) {
            sprite.flip_x = *facing == Facing::Left;
        }
    }
}

// ── PostUpdate: Pixel snapping ───────────────────────────────────────────────

/// Snap the player's visual to whole pixels while grounded.
///
/// Only the [`PlayerVisual`] child moves; the physics body is never touched.
pub fn pixel_snap_system(
    q_player: Query<(&Transform, &GroundedDetector, &Children), With<Player>>,
    mut q_visual: Query<&mut Transform, (With<PlayerVisual>, Without<Player>)>,
) {
    let Ok((body, grounded, children)) = q_player.single() else {
        return;
    };

    let offset = if grounded.is_grounded {
        pixel_snap_offset(body.translation.truncate())
    } else {
        Vec2::ZERO
    };

    for child in children.iter() {
        if let Ok(mut visual) = q_visual.get_mut(child) {
            visual.translation.x = offset.x;
            visual.translation.y = offset.y;
        }
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── helpers ───────────────────────────────────────────────────────────────

    /// Build a minimal Bevy `App` with just the resources needed to test the
    /// PlayerIntent → velocity pipeline, without Rapier or rendering.
    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(PlayerIntent::default());
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, (apply_player_intent_system, clamp_velocity_system).chain());
        app
    }

    fn spawn_test_player(app: &mut App, grounded: bool, linvel: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                Velocity::linear(linvel),
                GroundedDetector {
                    is_grounded: grounded,
                    consecutive_grounded_frames: if grounded { 2 } else { 0 },
                },
                JumpEdge::default(),
                Facing::default(),
            ))
            .id()
    }

    fn run_with(app: &mut App, intent: PlayerIntent) {
        app.insert_resource(intent);
        app.update();
    }

    fn velocity(app: &App, e: Entity) -> Vec2 {
        app.world().get::<Velocity>(e).unwrap().linvel
    }

    // ── pure rules ────────────────────────────────────────────────────────────

    #[test]
    fn held_direction_sets_full_speed() {
        assert_eq!(step_horizontal(0.0, -1.0, 300.0, 0.8), -300.0);
        assert_eq!(step_horizontal(-300.0, 1.0, 300.0, 0.8), 300.0);
    }

    #[test]
    fn released_direction_applies_friction() {
        assert!((step_horizontal(300.0, 0.0, 300.0, 0.8) - 240.0).abs() < 1e-4);
    }

    #[test]
    fn animation_follows_grounded_and_speed() {
        assert_eq!(next_animation(false, 0.0, 10.0), PlayerAnimation::Jumping);
        assert_eq!(next_animation(true, 5.0, 10.0), PlayerAnimation::Idle);
        assert_eq!(next_animation(true, -200.0, 10.0), PlayerAnimation::Walking);
    }

    #[test]
    fn snap_offset_lands_on_whole_pixels() {
        let body = Vec2::new(100.4, 219.6);
        let snapped = body + pixel_snap_offset(body);
        assert_eq!(snapped, Vec2::new(100.0, 220.0));
    }

    // ── apply_player_intent_system ────────────────────────────────────────────

    #[test]
    fn grounded_jump_sets_jump_velocity_and_goes_airborne() {
        let mut app = build_test_app();
        let e = spawn_test_player(&mut app, true, Vec2::ZERO);

        run_with(
            &mut app,
            PlayerIntent {
                jump_held: true,
                ..Default::default()
            },
        );

        let cfg = GameConfig::default();
        let expected = cfg.player_jump_power.min(cfg.player_max_velocity_y);
        assert!((velocity(&app, e).y - expected).abs() < 1e-4);
        assert!(!app.world().get::<GroundedDetector>(e).unwrap().is_grounded);
    }

    #[test]
    fn airborne_jump_is_ignored() {
        let mut app = build_test_app();
        let e = spawn_test_player(&mut app, false, Vec2::new(0.0, -50.0));

        run_with(
            &mut app,
            PlayerIntent {
                jump_held: true,
                ..Default::default()
            },
        );

        assert!(velocity(&app, e).y < 0.0);
    }

    #[test]
    fn holding_jump_does_not_repeat() {
        let mut app = build_test_app();
        let e = spawn_test_player(&mut app, true, Vec2::ZERO);
        let held = PlayerIntent {
            jump_held: true,
            ..Default::default()
        };

        run_with(&mut app, held);
        // Land again while the key is still down.
        app.world_mut().get_mut::<Velocity>(e).unwrap().linvel.y = 0.0;
        *app.world_mut().get_mut::<GroundedDetector>(e).unwrap() = GroundedDetector {
            is_grounded: true,
            consecutive_grounded_frames: 2,
        };
        run_with(&mut app, held);

        assert_eq!(velocity(&app, e).y, 0.0);
    }

    #[test]
    fn moving_left_faces_left() {
        let mut app = build_test_app();
        let e = spawn_test_player(&mut app, true, Vec2::ZERO);

        run_with(
            &mut app,
            PlayerIntent {
                left: true,
                ..Default::default()
            },
        );

        assert_eq!(*app.world().get::<Facing>(e).unwrap(), Facing::Left);
        assert!(velocity(&app, e).x < 0.0);
    }

    #[test]
    fn velocity_is_clamped_on_both_axes() {
        let mut app = build_test_app();
        let e = spawn_test_player(&mut app, false, Vec2::new(0.0, -5000.0));
        app.world_mut().get_mut::<Velocity>(e).unwrap().linvel.x = 9000.0;

        // Friction keeps most of the x speed; the clamp must still cap it.
        run_with(&mut app, PlayerIntent::default());

        let cfg = GameConfig::default();
        let v = velocity(&app, e);
        assert_eq!(v.x, cfg.player_max_velocity_x);
        assert_eq!(v.y, -cfg.player_max_velocity_y);
    }
}
