use crate::config::GameConfig;
use crate::level::Viewport;
use crate::player::Player;
use bevy::prelude::*;

/// Spawn the 2D camera centred on the ground line of a default viewport.
pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    let viewport = Viewport::from_config(&config);
    let y = camera_target_y(config.spawn_y(), &config, &viewport);
    commands.spawn((Camera2d, Transform::from_xyz(viewport.width * 0.5, y, 0.0)));
    info!("Camera spawned");
}

/// Camera centre Y for a player at `player_y`.
///
/// Looks `camera_follow_offset` above the player, never lets the bottom edge
/// drop below the ground slab and never shows past the top of the world.
pub fn camera_target_y(player_y: f32, config: &GameConfig, viewport: &Viewport) -> f32 {
    let half = viewport.height * 0.5;
    let min = config.ground_y - config.ground_height + half;
    let max = (config.ground_y + config.world_height() - half).max(min);
    (player_y + config.camera_follow_offset).clamp(min, max)
}

/// Ease the camera toward the player vertically; X stays on the viewport centre.
pub fn camera_follow_system(
    config: Res<GameConfig>,
    viewport: Res<Viewport>,
    q_player: Query<&Transform, With<Player>>,
    mut q_camera: Query<&mut Transform, (With<Camera>, Without<Player>)>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    let Ok(mut cam) = q_camera.single_mut() else {
        return;
    };

    let target = camera_target_y(player_transform.translation.y, &config, &viewport);
    let t = config.camera_follow_lerp.clamp(0.0, 1.0);
    cam.translation.x = viewport.width * 0.5;
    cam.translation.y += (target - cam.translation.y) * t;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_never_shows_below_the_ground() {
        let cfg = GameConfig::default();
        let vp = Viewport::from_config(&cfg);
        let y = camera_target_y(cfg.ground_y, &cfg, &vp);
        assert!(y - vp.height * 0.5 >= cfg.ground_y - cfg.ground_height - 1e-3);
    }

    #[test]
    fn camera_leads_a_high_player() {
        let cfg = GameConfig::default();
        let vp = Viewport::from_config(&cfg);
        let y = camera_target_y(2000.0, &cfg, &vp);
        assert_eq!(y, 2000.0 + cfg.camera_follow_offset);
    }

    #[test]
    fn camera_stops_at_the_top_of_the_world() {
        let cfg = GameConfig::default();
        let vp = Viewport::from_config(&cfg);
        let top = cfg.ground_y + cfg.world_height();
        let y = camera_target_y(top + 5000.0, &cfg, &vp);
        assert!((y + vp.height * 0.5 - top).abs() < 1e-3);
    }
}
