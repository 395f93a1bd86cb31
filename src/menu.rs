//! Level-select screen: `GameState` definition and `MenuPlugin`.
//!
//! ## States
//!
//! | State         | Description                                  |
//! |---------------|----------------------------------------------|
//! | `LevelSelect` | Initial state; level buttons shown           |
//! | `Playing`     | A play session is running                    |
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System                     | Schedule                  | Purpose                               |
//! |----------------------------|---------------------------|---------------------------------------|
//! | `setup_level_select`       | `OnEnter(LevelSelect)`    | Spawn the level grid                  |
//! | `cleanup_level_select`     | `OnExit(LevelSelect)`     | Despawn the menu UI                   |
//! | `level_button_system`      | `Update / in LevelSelect` | Start a session from a clicked button |
//! | `level_key_system`         | `Update / in LevelSelect` | Keys 1–9 and 0 start a session; Esc quits |
//! | `return_to_menu_system`    | `Update / in Playing`     | Esc abandons the session              |

use crate::catalog::LevelCatalog;
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine.
///
/// Every gameplay system runs under `.run_if(in_state(GameState::Playing))`,
/// so nothing simulates while the level grid is displayed.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Level-select screen; shown on startup and after the last level.
    #[default]
    LevelSelect,
    /// Active play session.
    Playing,
}

/// Parameters handed from the level-select screen to the next session.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// 1-based level the session starts on.
    pub start_level: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { start_level: 1 }
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the level-select UI; despawned on `OnExit(LevelSelect)`.
#[derive(Component)]
pub struct LevelSelectRoot;

/// A level button carrying the 1-based level it starts.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelButton(pub u32);

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `GameState`, the level-select UI and its input handlers.
///
/// Add this plugin **before** any plugin that uses
/// `.run_if(in_state(GameState::Playing))`.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<SessionConfig>()
            .add_systems(OnEnter(GameState::LevelSelect), setup_level_select)
            .add_systems(OnExit(GameState::LevelSelect), cleanup_level_select)
            .add_systems(
                Update,
                (level_button_system, level_key_system).run_if(in_state(GameState::LevelSelect)),
            )
            .add_systems(
                Update,
                return_to_menu_system.run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn title_color() -> Color {
    Color::srgb(1.0, 0.86, 0.20)
}
fn hint_color() -> Color {
    Color::srgb(0.85, 0.85, 0.90)
}
fn button_border() -> Color {
    Color::srgb(0.25, 0.18, 0.05)
}
fn button_text() -> Color {
    Color::srgb(0.10, 0.08, 0.04)
}

fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

// ── Input mapping ─────────────────────────────────────────────────────────────

/// Level started by a number key: 1–9 map to levels 1–9, 0 to level 10.
pub fn level_for_key(key: KeyCode) -> Option<u32> {
    match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(1),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(2),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(3),
        KeyCode::Digit4 | KeyCode::Numpad4 => Some(4),
        KeyCode::Digit5 | KeyCode::Numpad5 => Some(5),
        KeyCode::Digit6 | KeyCode::Numpad6 => Some(6),
        KeyCode::Digit7 | KeyCode::Numpad7 => Some(7),
        KeyCode::Digit8 | KeyCode::Numpad8 => Some(8),
        KeyCode::Digit9 | KeyCode::Numpad9 => Some(9),
        KeyCode::Digit0 | KeyCode::Numpad0 => Some(10),
        _ => None,
    }
}

// ── OnEnter(LevelSelect): spawn UI ────────────────────────────────────────────

/// Spawn the full-screen level grid.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │               BANANA PARTY                  │
/// │                                             │
/// │        [1] [2] [3] [4] [5]                  │
/// │        [6] [7] [8] [9] [10]                 │
/// │                                             │
/// │   Press 1–9 or 0 · Arrows move · Up jumps   │
/// └─────────────────────────────────────────────┘
/// ```
///
/// Each button is tinted with its level's sky colour.
pub fn setup_level_select(mut commands: Commands, catalog: Res<LevelCatalog>) {
    let levels = catalog.len() as u32;
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgb(0.12, 0.30, 0.12)),
            LevelSelectRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Text::new("BANANA PARTY"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(title_color()),
            ));

            spacer(root, 40.0);

            root.spawn(Node {
                flex_direction: FlexDirection::Row,
                flex_wrap: FlexWrap::Wrap,
                justify_content: JustifyContent::Center,
                max_width: Val::Px(520.0),
                column_gap: Val::Px(14.0),
                row_gap: Val::Px(14.0),
                ..default()
            })
            .with_children(|grid| {
                for level in 1..=levels {
                    grid.spawn((
                        Button,
                        Node {
                            width: Val::Px(80.0),
                            height: Val::Px(80.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(3.0)),
                            ..default()
                        },
                        BackgroundColor(catalog.palette(level).sky),
                        BorderColor::all(button_border()),
                        LevelButton(level),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new(level.to_string()),
                            TextFont {
                                font_size: 32.0,
                                ..default()
                            },
                            TextColor(button_text()),
                        ));
                    });
                }
            });

            spacer(root, 40.0);

            root.spawn((
                Text::new("Press 1-9 or 0  ·  Arrows move  ·  Up jumps  ·  Esc quits"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(hint_color()),
            ));
        });
}

/// Recursively despawn all level-select entities.
pub fn cleanup_level_select(mut commands: Commands, query: Query<Entity, With<LevelSelectRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Input handlers ────────────────────────────────────────────────────────────

/// Start a session from a pressed level button; highlight on hover.
pub fn level_button_system(
    query: Query<(&Interaction, &LevelButton, &Children), Changed<Interaction>>,
    mut btn_text: Query<&mut TextColor>,
    mut session: ResMut<SessionConfig>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (interaction, button, children) in query.iter() {
        let color = match interaction {
            Interaction::Pressed => {
                session.start_level = button.0;
                next_state.set(GameState::Playing);
                continue;
            }
            Interaction::Hovered => Color::WHITE,
            Interaction::None => button_text(),
        };
        for child in children.iter() {
            if let Ok(mut text_color) = btn_text.get_mut(child) {
                *text_color = TextColor(color);
            }
        }
    }
}

/// Number keys pick a level; Escape quits the game.
pub fn level_key_system(
    keys: Res<ButtonInput<KeyCode>>,
    catalog: Res<LevelCatalog>,
    mut session: ResMut<SessionConfig>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
        return;
    }
    let picked = keys
        .get_just_pressed()
        .filter_map(|key| level_for_key(*key))
        .find(|level| *level as usize <= catalog.len());
    if let Some(level) = picked {
        session.start_level = level;
        next_state.set(GameState::Playing);
        info!("Level {level} selected");
    }
}

/// Escape during play abandons the session and returns to the level grid.
pub fn return_to_menu_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        next_state.set(GameState::LevelSelect);
    }
}
