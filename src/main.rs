use banana_party::catalog::LevelCatalog;
use banana_party::config::{self, GameConfig};
use banana_party::constants::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use banana_party::error::GameError;
use banana_party::graphics;
use banana_party::hud::HudPlugin;
use banana_party::level::LevelPlugin;
use banana_party::menu::{GameState, MenuPlugin, SessionConfig};
use banana_party::one_way::OneWayPlatformHooks;
use banana_party::player::PlayerPlugin;
use banana_party::rendering::RenderingPlugin;
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use std::env;

/// Configure Rapier physics: world gravity points down the y axis.
fn setup_physics_config(
    game_config: Res<GameConfig>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -game_config.world_gravity);
    }
}

/// Leave the level-select screen on the first frame; used by `BANANA_START_LEVEL`.
fn skip_level_select(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}

fn main() -> Result<(), GameError> {
    // Skip the level-select screen and start straight at this level.
    let start_level = env::var("BANANA_START_LEVEL")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok());

    let catalog = LevelCatalog::baked()?;

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Banana Party".into(),
            resolution: WindowResolution::new(VIEWPORT_WIDTH as u32, VIEWPORT_HEIGHT as u32),
            resizable: false,
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.53, 0.81, 0.92)))
    // Insert GameConfig with compiled defaults; load_game_config will
    // overwrite it from assets/game.toml (if present) in the Startup schedule.
    .insert_resource(GameConfig::default())
    // pixels_per_meter(1.0) keeps every length and speed in pixels; the
    // hooks parameter applies the one-way platform contact rules.
    .add_plugins(RapierPhysicsPlugin::<OneWayPlatformHooks>::pixels_per_meter(1.0))
    .add_plugins(MenuPlugin)
    .add_plugins((LevelPlugin, PlayerPlugin, HudPlugin, RenderingPlugin))
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_game_config,
            setup_physics_config.after(config::load_game_config),
            graphics::setup_camera.after(config::load_game_config),
        ),
    )
    .add_systems(
        PostUpdate,
        graphics::camera_follow_system
            .after(PhysicsSet::Writeback)
            .before(TransformSystems::Propagate)
            .run_if(in_state(GameState::Playing)),
    );

    match start_level {
        Some(level) if level >= 1 && level as usize <= catalog.len() => {
            // Entering Playing waits for Startup so the session sees the loaded config.
            app.insert_resource(SessionConfig { start_level: level })
                .add_systems(Startup, skip_level_select.after(config::load_game_config));
            info!("Starting directly at level {level}");
        }
        Some(level) => {
            warn!(
                "BANANA_START_LEVEL={level} is outside 1..={}; showing level select",
                catalog.len()
            );
        }
        None => {}
    }

    app.insert_resource(catalog);
    app.run();
    Ok(())
}
