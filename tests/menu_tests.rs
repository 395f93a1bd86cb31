//! Headless tests for the [`GameState`] state machine and level-select input.
//!
//! These tests use [`MinimalPlugins`] (no window, no rendering, no physics)
//! so they run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `LevelSelect`.
//! 2. A `NextState` request transitions from `LevelSelect` → `Playing`.
//! 3. `insert_state` can force-start directly in `Playing`.
//! 4. A number key picks the start level and enters `Playing`.
//! 5. Escape during play returns to `LevelSelect`.

use banana_party::catalog::LevelCatalog;
use banana_party::menu::{GameState, LevelSelectRoot, MenuPlugin, SessionConfig};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with just the state registered via `init_state`.
fn app_with_default_state() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

/// Build a headless app running the real `MenuPlugin` with keyboard input.
fn app_with_menu() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_resource::<ButtonInput<KeyCode>>();
    app.insert_resource(LevelCatalog::baked().expect("baked catalog"));
    app.add_plugins(MenuPlugin);
    app.update();
    app
}

fn press(app: &mut App, key: KeyCode) {
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.reset_all();
    keys.press(key);
}

fn state(app: &App) -> GameState {
    app.world().resource::<State<GameState>>().get().clone()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_level_select() {
    let mut app = app_with_default_state();
    app.update();
    assert_eq!(state(&app), GameState::LevelSelect);
}

#[test]
fn transition_level_select_to_playing() {
    let mut app = app_with_default_state();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();

    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn insert_state_starts_in_playing() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_state(GameState::Playing);
    app.update();

    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn level_select_screen_is_spawned_on_startup() {
    let mut app = app_with_menu();
    let world = app.world_mut();
    let mut q = world.query_filtered::<Entity, With<LevelSelectRoot>>();
    assert_eq!(q.iter(world).count(), 1);
}

#[test]
fn number_key_starts_that_level() {
    let mut app = app_with_menu();

    press(&mut app, KeyCode::Digit3);
    app.update(); // key handled, transition queued
    app.update(); // StateTransition fires

    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<SessionConfig>().start_level, 3);

    let world = app.world_mut();
    let mut q = world.query_filtered::<Entity, With<LevelSelectRoot>>();
    assert_eq!(q.iter(world).count(), 0, "menu UI must be cleaned up");
}

#[test]
fn zero_key_starts_level_ten() {
    let mut app = app_with_menu();

    press(&mut app, KeyCode::Digit0);
    app.update();

    assert_eq!(app.world().resource::<SessionConfig>().start_level, 10);
}

#[test]
fn escape_during_play_returns_to_level_select() {
    let mut app = app_with_menu();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    assert_eq!(state(&app), GameState::Playing);

    press(&mut app, KeyCode::Escape);
    app.update();
    app.update();

    assert_eq!(state(&app), GameState::LevelSelect);
}
