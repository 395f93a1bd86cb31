//! End-to-end level progression without a window or a physics pipeline.
//!
//! Sensor overlaps are injected as Rapier `CollisionEvent` messages, exactly as
//! the physics step would emit them, and the world is inspected afterwards.

use banana_party::catalog::LevelCatalog;
use banana_party::config::GameConfig;
use banana_party::level::{
    Collectible, Goal, LevelBackground, LevelPhase, LevelPlugin, Platform, ProgressState,
};
use banana_party::menu::{GameState, SessionConfig};
use banana_party::player::Player;
use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

fn session_app(start_level: u32) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.add_message::<CollisionEvent>();
    app.insert_resource(GameConfig::default());
    app.insert_resource(LevelCatalog::baked().expect("baked catalog"));
    app.insert_resource(SessionConfig { start_level });
    app.insert_state(GameState::Playing);
    app.add_plugins(LevelPlugin);
    app.update();
    app.update();
    app
}

fn count<F: QueryFilter>(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut q = world.query_filtered::<Entity, F>();
    q.iter(world).count()
}

fn first<F: QueryFilter>(app: &mut App) -> Entity {
    let world = app.world_mut();
    let mut q = world.query_filtered::<Entity, F>();
    q.iter(world).next().expect("entity present")
}

fn overlap(app: &mut App, a: Entity, b: Entity) {
    app.world_mut()
        .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::SENSOR));
    app.update();
    // Let the rebuilt level's goal activate.
    app.update();
}

#[test]
fn climbing_from_level_one_to_level_two_keeps_bananas() {
    let mut app = session_app(1);
    assert_eq!(count::<With<Platform>>(&mut app), 11);

    let player = first::<With<Player>>(&mut app);
    let banana = first::<With<Collectible>>(&mut app);
    overlap(&mut app, player, banana);
    assert_eq!(
        app.world().resource::<ProgressState>().collectibles_collected,
        1
    );

    let goal = first::<With<Goal>>(&mut app);
    overlap(&mut app, goal, player);

    let progress = app.world().resource::<ProgressState>().clone();
    assert_eq!(progress.current_level, 2);
    assert_eq!(progress.collectibles_collected, 1);
    assert_eq!(count::<With<Platform>>(&mut app), 10);
    assert_eq!(count::<With<Goal>>(&mut app), 1);
    assert_eq!(count::<With<LevelBackground>>(&mut app), 1);
    assert_eq!(*app.world().resource::<LevelPhase>(), LevelPhase::Active);
}

#[test]
fn session_walks_every_remaining_level_then_returns_to_select() {
    let mut app = session_app(8);
    let player = first::<With<Player>>(&mut app);

    for expected in [9, 10] {
        let goal = first::<With<Goal>>(&mut app);
        overlap(&mut app, player, goal);
        assert_eq!(
            app.world().resource::<ProgressState>().current_level,
            expected
        );
    }

    let goal = first::<With<Goal>>(&mut app);
    overlap(&mut app, player, goal);

    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::LevelSelect
    );
    assert_eq!(count::<With<Goal>>(&mut app), 0);
    assert_eq!(count::<With<Player>>(&mut app), 0);
}

#[test]
fn height_record_tracks_the_climb_and_resets_per_level() {
    let mut app = session_app(1);
    let player = first::<With<Player>>(&mut app);

    app.world_mut()
        .get_mut::<Transform>(player)
        .expect("player transform")
        .translation
        .y = 1234.0;
    app.update();
    assert_eq!(app.world().resource::<ProgressState>().meters_climbed, 123);

    let goal = first::<With<Goal>>(&mut app);
    overlap(&mut app, player, goal);
    assert_eq!(app.world().resource::<ProgressState>().meters_climbed, 0);
}
