//! Contact sensing, grounded detection and platform stabilization.
//!
//! Runs in `Update` against the contacts Rapier resolved on the previous step:
//!
//! 1. [`ground_contact_sensing_system`] fills [`GroundSignals`] from the contact graph.
//! 2. [`grounded_detection_system`] feeds the signals through [`GroundedDetector`].
//! 3. [`platform_stabilization_system`] snaps a slowly settling player onto a platform top.

use super::state::Player;
use crate::config::GameConfig;
use crate::constants::{GROUND_NORMAL_MIN_DOT, STABILIZATION_CLEARANCE};
use crate::grounded::{GroundSignals, GroundedDetector, GroundedThresholds};
use crate::level::{Ground, PlatformFootprint};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Downward component of a manifold normal as seen from the player.
///
/// Rapier's manifold normal points from collider 1 towards collider 2, so the
/// sign flips with the player's position in the pair.
#[inline]
pub fn downward_component(normal: Vec2, player_is_first: bool) -> f32 {
    if player_is_first {
        -normal.y
    } else {
        normal.y
    }
}

/// Fill [`GroundSignals`] for the player from Rapier's active contact pairs.
pub fn ground_contact_sensing_system(
    rapier_context: ReadRapierContext,
    mut q_player: Query<(Entity, &Velocity, &mut GroundSignals), With<Player>>,
    q_ground: Query<(), With<Ground>>,
) {
    let Ok((player_entity, velocity, mut signals)) = q_player.single_mut() else {
        return;
    };
    let Ok(rapier) = rapier_context.single() else {
        return;
    };

    let mut touching_down = false;
    let mut blocked_down = false;

    for contact_pair in rapier.contact_pairs_with(player_entity) {
        if !contact_pair.has_any_active_contact() {
            continue;
        }
        let Some(e1) = contact_pair.collider1() else {
            continue;
        };
        let Some(e2) = contact_pair.collider2() else {
            continue;
        };

        let (other, player_is_first) = if e1 == player_entity {
            (e2, true)
        } else if e2 == player_entity {
            (e1, false)
        } else {
            continue;
        };

        let under_feet = contact_pair.manifolds().any(|manifold| {
            // Solver contacts, not raw points: a one-way platform being passed
            // through still has points but no solver contacts.
            manifold.num_solver_contacts() > 0
                && downward_component(manifold.normal(), player_is_first) > GROUND_NORMAL_MIN_DOT
        });
        if !under_feet {
            continue;
        }

        touching_down = true;
        if q_ground.contains(other) {
            blocked_down = true;
        }
    }

    *signals = GroundSignals {
        touching_down,
        blocked_down,
        fall_speed: -velocity.linvel.y,
    };
}

/// Advance the player's [`GroundedDetector`] with this frame's signals.
pub fn grounded_detection_system(
    config: Res<GameConfig>,
    mut q: Query<(&GroundSignals, &mut GroundedDetector), With<Player>>,
) {
    let thresholds = GroundedThresholds::from_config(&config);
    for (signals, mut detector) in q.iter_mut() {
        detector.step(config.grounded_strategy, *signals, thresholds);
    }
}

/// Tolerances for [`stabilize_on_platform`].
#[derive(Debug, Clone, Copy)]
pub struct StabilizationWindow {
    pub max_fall_speed: f32,
    pub above: f32,
    pub below: f32,
}

impl StabilizationWindow {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            max_fall_speed: config.stabilization_max_fall_speed,
            above: config.stabilization_above_tolerance,
            below: config.stabilization_below_tolerance,
        }
    }
}

/// Centre Y the player should be snapped to, if any.
///
/// Applies only while falling slowly, with the player's bottom edge inside a
/// narrow band around the platform top and horizontally overlapping it.
pub fn stabilize_on_platform(
    player_center: Vec2,
    player_half_size: Vec2,
    fall_speed: f32,
    platform: &PlatformFootprint,
    window: StabilizationWindow,
) -> Option<f32> {
    if fall_speed <= 0.0 || fall_speed >= window.max_fall_speed {
        return None;
    }

    let bottom = player_center.y - player_half_size.y;
    let left = player_center.x - player_half_size.x;
    let right = player_center.x + player_half_size.x;

    let over = right > platform.left() && left < platform.right();
    let close = bottom <= platform.top + window.above && bottom >= platform.top - window.below;

    (over && close).then(|| platform.top + player_half_size.y + STABILIZATION_CLEARANCE)
}

/// Snap a slowly settling player onto the platform beneath it.
pub fn platform_stabilization_system(
    config: Res<GameConfig>,
    mut q_player: Query<(&mut Transform, &mut Velocity, &mut GroundedDetector), With<Player>>,
    q_platforms: Query<&PlatformFootprint>,
) {
    let Ok((mut transform, mut velocity, mut detector)) = q_player.single_mut() else {
        return;
    };

    let window = StabilizationWindow::from_config(&config);
    let half = Vec2::new(config.player_body_width, config.player_body_height) * 0.5;
    let fall_speed = -velocity.linvel.y;
    let center = transform.translation.truncate();

    for platform in q_platforms.iter() {
        if let Some(y) = stabilize_on_platform(center, half, fall_speed, platform, window) {
            transform.translation.y = y;
            velocity.linvel.y = 0.0;
            detector.force_grounded(config.grounded_min_frames);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> PlatformFootprint {
        PlatformFootprint {
            center_x: 640.0,
            half_width: 150.0,
            top: 400.0,
        }
    }

    fn window() -> StabilizationWindow {
        StabilizationWindow::from_config(&GameConfig::default())
    }

    const HALF: Vec2 = Vec2::new(35.0, 45.0);

    #[test]
    fn normal_direction_depends_on_pair_order() {
        // Platform below the player: normal from player (1) to platform (2) points down.
        assert!(downward_component(Vec2::new(0.0, -1.0), true) > GROUND_NORMAL_MIN_DOT);
        // Same contact with the pair swapped.
        assert!(downward_component(Vec2::new(0.0, 1.0), false) > GROUND_NORMAL_MIN_DOT);
        // Wall contact.
        assert!(downward_component(Vec2::new(1.0, 0.0), true) < GROUND_NORMAL_MIN_DOT);
    }

    #[test]
    fn slow_fall_just_above_top_snaps() {
        let center = Vec2::new(640.0, 400.0 + 45.0 + 1.0);
        let y = stabilize_on_platform(center, HALF, 5.0, &platform(), window());
        assert_eq!(y, Some(400.0 + 45.0 + STABILIZATION_CLEARANCE));
    }

    #[test]
    fn rising_or_fast_fall_never_snaps() {
        let center = Vec2::new(640.0, 446.0);
        assert!(stabilize_on_platform(center, HALF, -5.0, &platform(), window()).is_none());
        assert!(stabilize_on_platform(center, HALF, 0.0, &platform(), window()).is_none());
        assert!(stabilize_on_platform(center, HALF, 50.0, &platform(), window()).is_none());
    }

    #[test]
    fn off_to_the_side_never_snaps() {
        let center = Vec2::new(640.0 + 150.0 + 36.0, 446.0);
        assert!(stabilize_on_platform(center, HALF, 5.0, &platform(), window()).is_none());
    }

    #[test]
    fn deep_below_top_never_snaps() {
        let center = Vec2::new(640.0, 400.0 + 45.0 - 20.0);
        assert!(stabilize_on_platform(center, HALF, 5.0, &platform(), window()).is_none());
    }

    #[test]
    fn stabilization_system_grounds_the_player() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameConfig::default());
        app.add_systems(Update, platform_stabilization_system);
        app.world_mut().spawn(platform());
        let player = app
            .world_mut()
            .spawn((
                Player,
                Transform::from_xyz(640.0, 446.0, 0.0),
                Velocity::linear(Vec2::new(0.0, -4.0)),
                GroundedDetector::default(),
            ))
            .id();

        app.update();

        let detector = app.world().get::<GroundedDetector>(player).unwrap();
        assert!(detector.is_grounded);
        assert_eq!(app.world().get::<Velocity>(player).unwrap().linvel.y, 0.0);
    }
}
