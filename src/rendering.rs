//! Retained `Mesh2d` visuals for bananas and the goal pennant.
//!
//! Level entities are spawned with physics and bookkeeping only; the systems
//! here query `Added<Collectible>` / `Added<Goal>` and attach a shared mesh and
//! material the frame after spawn, so rebuilding a level never re-tessellates.

use crate::config::GameConfig;
use crate::constants::{COLLECTIBLE_HEIGHT, COLLECTIBLE_SCALE, COLLECTIBLE_WIDTH};
use crate::level::{Collectible, Goal};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use std::f32::consts::PI;

/// Shared mesh and material handles, created once at startup.
#[derive(Resource)]
pub struct LevelMeshes {
    pub banana: Handle<Mesh>,
    pub banana_material: Handle<ColorMaterial>,
    pub pennant: Handle<Mesh>,
    pub pennant_material: Handle<ColorMaterial>,
}

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            setup_level_meshes.after(crate::config::load_game_config),
        )
        .add_systems(
            Update,
            (attach_banana_mesh_system, attach_goal_mesh_system),
        );
    }
}

pub fn setup_level_meshes(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let banana_size = Vec2::new(COLLECTIBLE_WIDTH, COLLECTIBLE_HEIGHT) * COLLECTIBLE_SCALE;
    commands.insert_resource(LevelMeshes {
        banana: meshes.add(crescent_mesh(banana_size.y * 0.5, banana_size.x * 0.45, 16)),
        banana_material: materials.add(ColorMaterial::from_color(Color::srgb(1.0, 0.88, 0.15))),
        pennant: meshes.add(pennant_mesh(config.goal_size)),
        pennant_material: materials.add(ColorMaterial::from_color(Color::srgb(0.95, 0.25, 0.55))),
    });
}

fn attach_banana_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Collectible>>,
    level_meshes: Option<Res<LevelMeshes>>,
) {
    let Some(level_meshes) = level_meshes else {
        return;
    };
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh2d(level_meshes.banana.clone()),
            MeshMaterial2d(level_meshes.banana_material.clone()),
        ));
    }
}

fn attach_goal_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Goal>>,
    level_meshes: Option<Res<LevelMeshes>>,
) {
    let Some(level_meshes) = level_meshes else {
        return;
    };
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh2d(level_meshes.pennant.clone()),
            MeshMaterial2d(level_meshes.pennant_material.clone()),
        ));
    }
}

// ── Mesh helpers ──────────────────────────────────────────────────────────────

/// Banana-shaped crescent: an arc of `radius` bowed to the left, `thickness`
/// wide in the middle and tapering to points at both tips.
pub fn crescent_mesh(radius: f32, thickness: f32, segments: u32) -> Mesh {
    let segments = segments.max(2);
    let sweep = PI * 0.6;
    let start = PI - sweep * 0.5;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(2 * (segments as usize + 1));
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let angle = start + sweep * t;
        let half = thickness * 0.5 * (PI * t).sin();
        let dir = Vec2::new(angle.cos(), angle.sin());
        // Shift so the arc midpoint sits on the entity origin.
        let outer = dir * (radius + half) + Vec2::X * radius;
        let inner = dir * (radius - half) + Vec2::X * radius;
        positions.push([outer.x, outer.y, 0.0]);
        positions.push([inner.x, inner.y, 0.0]);
    }
    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let o0 = 2 * i;
        let i0 = o0 + 1;
        let o1 = o0 + 2;
        let i1 = o0 + 3;
        indices.extend_from_slice(&[o0, i0, o1, o1, i0, i1]);
    }
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Flag on a pole, `size` tall and centred on the origin.
pub fn pennant_mesh(size: f32) -> Mesh {
    let half = size * 0.5;
    let pole = size * 0.05;
    let flag_w = size * 0.55;
    let flag_h = size * 0.35;
    let x0 = -half * 0.5;
    let positions: Vec<[f32; 3]> = vec![
        // pole
        [x0, -half, 0.0],
        [x0 + pole, -half, 0.0],
        [x0 + pole, half, 0.0],
        [x0, half, 0.0],
        // flag
        [x0 + pole, half, 0.0],
        [x0 + pole + flag_w, half - flag_h * 0.5, 0.0],
        [x0 + pole, half - flag_h, 0.0],
    ];
    let indices = Indices::U32(vec![0, 1, 2, 0, 2, 3, 4, 6, 5]);
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(indices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_count(mesh: &Mesh) -> usize {
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            .map(|a| a.len())
            .unwrap_or(0)
    }

    #[test]
    fn crescent_indices_stay_in_range() {
        let mesh = crescent_mesh(36.0, 20.0, 16);
        let n = vertex_count(&mesh);
        assert_eq!(n, 34);
        let indices = mesh.indices().expect("indexed");
        assert_eq!(indices.len(), 16 * 6);
        assert!(indices.iter().all(|i| i < n));
    }

    #[test]
    fn pennant_fits_in_goal_square() {
        let mesh = pennant_mesh(150.0);
        let Some(bevy_mesh::VertexAttributeValues::Float32x3(pos)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        assert!(pos.iter().all(|p| p[0].abs() <= 75.0 && p[1].abs() <= 75.0));
    }
}
