//! Top-left progress readout shown during play.

use crate::level::{ProgressState, SessionEntity};
use crate::menu::GameState;
use bevy::prelude::*;

/// Marker for the HUD text node.
#[derive(Component)]
pub struct HudText;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), setup_hud)
            .add_systems(
                Update,
                hud_display_system.run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn hud_line(progress: &ProgressState) -> String {
    format!(
        "Level {}  Height {}m  Bananas {}",
        progress.current_level, progress.meters_climbed, progress.collectibles_collected
    )
}

/// Spawn the HUD as a session entity so session cleanup removes it.
pub fn setup_hud(mut commands: Commands, progress: Res<ProgressState>) {
    commands.spawn((
        Text::new(hud_line(&progress)),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.95, 0.55)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
        SessionEntity,
    ));
}

/// Rewrite the HUD only when progress changed.
pub fn hud_display_system(
    progress: Res<ProgressState>,
    mut q_text: Query<&mut Text, With<HudText>>,
) {
    if !progress.is_changed() {
        return;
    }
    for mut text in q_text.iter_mut() {
        *text = Text::new(hud_line(&progress));
    }
}
