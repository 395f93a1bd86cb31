//! Systems that move a play session through its [`LevelPhase`]s.
//!
//! Sensor overlaps arrive as Rapier `CollisionEvent` messages and are consumed
//! in `PostUpdate` after `PhysicsSet::Writeback`.  Every handler looks its
//! entities up through queries, so events naming a despawned goal or banana
//! simply fail the lookup and are dropped.

use super::spawn::{build_level, player_spawn_point, spawn_session_world, teardown_level};
use super::{
    Collectible, Goal, LevelAdvance, LevelEntity, LevelPhase, ProgressState, SessionEntity,
    Viewport,
};
use crate::catalog::LevelCatalog;
use crate::config::GameConfig;
use crate::grounded::GroundedDetector;
use crate::menu::{GameState, SessionConfig};
use crate::player::{reset_player, spawn_player, Player};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

/// The other entity of a started contact involving `player`, if any.
fn started_with(event: &CollisionEvent, player: Entity) -> Option<Entity> {
    let CollisionEvent::Started(e1, e2, _) = event else {
        return None;
    };
    if *e1 == player {
        Some(*e2)
    } else if *e2 == player {
        Some(*e1)
    } else {
        None
    }
}

// ── Session start / end ───────────────────────────────────────────────────────

/// Take the viewport size from the primary window, or from config when headless.
pub fn sync_viewport_system(
    config: Res<GameConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
) {
    *viewport = match windows.single() {
        Ok(window) => Viewport {
            width: window.width(),
            height: window.height(),
        },
        Err(_) => Viewport::from_config(&config),
    };
}

/// Start a play session at `SessionConfig::start_level`.
///
/// Spawns the session bodies and the player, builds the first level and turns
/// the physics pipeline back on.
#[allow(clippy::too_many_arguments)]
pub fn start_session(
    mut commands: Commands,
    session: Res<SessionConfig>,
    catalog: Res<LevelCatalog>,
    config: Res<GameConfig>,
    viewport: Res<Viewport>,
    mut progress: ResMut<ProgressState>,
    mut phase: ResMut<LevelPhase>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    for mut cfg in rapier_config.iter_mut() {
        cfg.physics_pipeline_active = true;
    }

    let start_level = session.start_level.max(1);
    let spawn = player_spawn_point(&config, &viewport);
    *progress = ProgressState::new(start_level, spawn.y);
    *phase = LevelPhase::Building;

    spawn_session_world(&mut commands, &config, &viewport);
    let player = spawn_player(&mut commands, &config, spawn);
    commands.entity(player).insert(SessionEntity);

    build_level(
        &mut commands,
        &catalog,
        &config,
        &viewport,
        start_level,
        &mut rand::thread_rng(),
    );
    info!("Session started at level {start_level}");
}

/// Despawn everything the session created and park the physics pipeline.
pub fn cleanup_session(
    mut commands: Commands,
    q_level: Query<(Entity, Option<&Collectible>), With<LevelEntity>>,
    q_session: Query<Entity, With<SessionEntity>>,
    mut phase: ResMut<LevelPhase>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    let removed = teardown_level(&mut commands, q_level.iter());
    for entity in q_session.iter() {
        commands.entity(entity).despawn();
    }
    *phase = LevelPhase::Building;

    // Rapier must not step while the removed handles are flushed.
    for mut cfg in rapier_config.iter_mut() {
        cfg.physics_pipeline_active = false;
    }
    info!("Session cleaned up ({removed} level entities)");
}

// ── Update ────────────────────────────────────────────────────────────────────

/// `Building → Active` once the current level's goal exists in the world.
pub fn level_ready_system(
    progress: Res<ProgressState>,
    q_goal: Query<&Goal>,
    mut phase: ResMut<LevelPhase>,
) {
    if *phase != LevelPhase::Building {
        return;
    }
    if q_goal.iter().any(|g| g.level == progress.current_level) {
        *phase = LevelPhase::Active;
        debug!("Level {} active", progress.current_level);
    }
}

/// Track the player's height record for the HUD.
pub fn height_tracking_system(
    config: Res<GameConfig>,
    q_player: Query<&Transform, With<Player>>,
    mut progress: ResMut<ProgressState>,
) {
    let Ok(transform) = q_player.single() else {
        return;
    };
    let y = transform.translation.y;
    if y > progress.max_height_reached {
        progress.record_height(y, config.ground_y, config.meters_divisor);
    }
}

// ── PostUpdate: sensor overlaps ───────────────────────────────────────────────

/// Count and remove a banana the first time the player overlaps it.
pub fn collectible_contact_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    q_player: Query<Entity, With<Player>>,
    mut q_collectible: Query<&mut Collectible>,
    mut progress: ResMut<ProgressState>,
) {
    let Ok(player_entity) = q_player.single() else {
        return;
    };

    for event in collision_events.read() {
        let Some(other) = started_with(event, player_entity) else {
            continue;
        };
        let Ok(mut collectible) = q_collectible.get_mut(other) else {
            continue;
        };
        if progress.collect_once(&mut collectible) {
            commands.entity(other).despawn();
            debug!("Banana collected ({} total)", progress.collectibles_collected);
        }
    }
}

/// `Active → GoalReached` on the player's first overlap with the current goal.
pub fn goal_contact_system(
    mut collision_events: MessageReader<CollisionEvent>,
    q_player: Query<Entity, With<Player>>,
    q_goal: Query<&Goal>,
    progress: Res<ProgressState>,
    mut phase: ResMut<LevelPhase>,
) {
    let Ok(player_entity) = q_player.single() else {
        return;
    };

    for event in collision_events.read() {
        if *phase != LevelPhase::Active {
            continue;
        }
        let Some(other) = started_with(event, player_entity) else {
            continue;
        };
        let Ok(goal) = q_goal.get(other) else {
            continue;
        };
        if goal.level == progress.current_level {
            *phase = LevelPhase::GoalReached;
            info!("Goal reached on level {}", goal.level);
        }
    }
}

/// Tear down the finished level and build the next one, or end the session.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn level_advance_system(
    mut commands: Commands,
    catalog: Res<LevelCatalog>,
    config: Res<GameConfig>,
    viewport: Res<Viewport>,
    mut progress: ResMut<ProgressState>,
    mut phase: ResMut<LevelPhase>,
    mut next_state: ResMut<NextState<GameState>>,
    q_level: Query<(Entity, Option<&Collectible>), With<LevelEntity>>,
    mut q_player: Query<(&mut Transform, &mut Velocity, &mut GroundedDetector), With<Player>>,
) {
    if *phase != LevelPhase::GoalReached {
        return;
    }

    match progress.advance(catalog.len()) {
        LevelAdvance::Next(level) => {
            teardown_level(&mut commands, q_level.iter());
            build_level(
                &mut commands,
                &catalog,
                &config,
                &viewport,
                level,
                &mut rand::thread_rng(),
            );

            let spawn = player_spawn_point(&config, &viewport);
            if let Ok((mut transform, mut velocity, mut detector)) = q_player.single_mut() {
                reset_player(&mut transform, &mut velocity, &mut detector, spawn);
            }
            progress.reset_height(spawn.y);
            *phase = LevelPhase::Building;
        }
        LevelAdvance::SessionComplete => {
            *phase = LevelPhase::SessionComplete;
            next_state.set(GameState::LevelSelect);
            info!(
                "All {} levels cleared with {} bananas",
                catalog.len(),
                progress.collectibles_collected
            );
        }
    }
}
