//! Level and session world construction.
//!
//! [`build_level`] turns one [`LevelDefinition`] into entities; [`teardown_level`]
//! queues their removal.  Both only queue commands, so a teardown followed by a
//! build in the same system lands in a single command batch.

use super::{
    Collectible, Goal, Ground, GroundSkin, LevelBackground, LevelEntity, Platform,
    PlatformFootprint, SessionEntity, Viewport, Wall,
};
use crate::catalog::{LevelCatalog, LevelPalette, PlatformSpec};
use crate::config::GameConfig;
use crate::constants::*;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

/// Collision footprint and visual size of one platform width-class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Collision box width.
    pub width: f32,
    /// Collision box height (the grass strip).
    pub height: f32,
    /// Collision box centre relative to the platform centre.
    pub offset_y: f32,
    pub visual_width: f32,
    pub visual_height: f32,
}

impl Footprint {
    /// Footprint for `width_class`, or `None` if the class is unknown.
    pub fn for_width_class(width_class: u8, config: &GameConfig) -> Option<Self> {
        let base = *PLATFORM_WIDTHS.get(width_class as usize)?;
        let visual_width = base * config.platform_scale;
        let visual_height =
            (config.platform_grass_height + config.platform_dirt_height) * config.platform_scale;
        let height = config.platform_grass_height * config.platform_scale;
        Some(Self {
            width: visual_width * config.platform_collision_width_factor,
            height,
            // Collider hugs the top of the sprite.
            offset_y: (visual_height - height) * 0.5,
            visual_width,
            visual_height,
        })
    }

    /// World Y of the walkable surface for a platform centred at `center_y`.
    #[inline]
    pub fn top(&self, center_y: f32) -> f32 {
        center_y + self.offset_y + self.height * 0.5
    }
}

/// World position of a platform centre.
#[inline]
pub fn platform_world_position(spec: &PlatformSpec, viewport_width: f32, ground_y: f32) -> Vec2 {
    Vec2::new(
        spec.x_factor.clamp(0.0, 1.0) * viewport_width,
        ground_y + spec.y_offset,
    )
}

/// Spawn-chance gate for a flagged platform.  A chance of 1.0 never consults `rng`.
pub fn should_spawn_collectible<R: Rng + ?Sized>(flagged: bool, chance: f32, rng: &mut R) -> bool {
    if !flagged || chance <= 0.0 {
        return false;
    }
    chance >= 1.0 || rng.gen::<f32>() < chance
}

/// Spawn point of the player for every level.
#[inline]
pub fn player_spawn_point(config: &GameConfig, viewport: &Viewport) -> Vec2 {
    Vec2::new(viewport.width * 0.5, config.spawn_y())
}

/// Summary of what [`build_level`] queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltLevel {
    pub platforms: usize,
    pub collectibles: usize,
}

/// Queue every entity of `level`: platforms, collectibles, goal, background
/// and ground skin.
pub fn build_level<R: Rng + ?Sized>(
    commands: &mut Commands,
    catalog: &LevelCatalog,
    config: &GameConfig,
    viewport: &Viewport,
    level: u32,
    rng: &mut R,
) -> BuiltLevel {
    let definition = catalog.level(level);
    let palette = catalog.palette(level);
    let mut built = BuiltLevel::default();

    for spec in &definition.platforms {
        let Some(footprint) = Footprint::for_width_class(spec.width_class, config) else {
            // Rejected by `LevelCatalog::new`; skip rather than panic.
            warn!("Level {level}: skipping platform with width class {}", spec.width_class);
            continue;
        };
        let center = platform_world_position(spec, viewport.width, config.ground_y);
        spawn_platform(commands, level, center, footprint, palette);
        built.platforms += 1;

        if should_spawn_collectible(spec.has_collectible, config.collectible_spawn_chance, rng) {
            let pos = Vec2::new(center.x, footprint.top(center.y) + config.collectible_offset);
            spawn_collectible(commands, level, pos);
            built.collectibles += 1;
        }
    }

    spawn_goal(
        commands,
        level,
        Vec2::new(viewport.width * 0.5, config.ground_y + definition.goal_height),
        config,
    );
    spawn_backdrop(commands, level, config, viewport, palette);

    info!(
        "Level {level} built: {} platforms, {} bananas",
        built.platforms, built.collectibles
    );
    built
}

/// Queue the despawn of every level entity yielded by `entities`.
///
/// Collectibles already marked collected were despawned on pickup and are skipped.
pub fn teardown_level<'a>(
    commands: &mut Commands,
    entities: impl IntoIterator<Item = (Entity, Option<&'a Collectible>)>,
) -> usize {
    let mut removed = 0;
    for (entity, collectible) in entities {
        if collectible.is_some_and(|c| c.collected) {
            continue;
        }
        commands.entity(entity).despawn();
        removed += 1;
    }
    removed
}

/// Queue one platform: a fixed one-way body whose collider covers the grass strip.
pub fn spawn_platform(
    commands: &mut Commands,
    level: u32,
    center: Vec2,
    footprint: Footprint,
    palette: LevelPalette,
) {
    let grass_height = footprint.height;
    commands
        .spawn((
            Platform,
            LevelEntity { level },
            PlatformFootprint {
                center_x: center.x,
                half_width: footprint.width * 0.5,
                top: footprint.top(center.y),
            },
            RigidBody::Fixed,
            Collider::compound(vec![(
                Vec2::new(0.0, footprint.offset_y),
                0.0,
                Collider::cuboid(footprint.width * 0.5, footprint.height * 0.5),
            )]),
            ActiveHooks::FILTER_CONTACT_PAIRS | ActiveHooks::MODIFY_SOLVER_CONTACTS,
            Sprite::from_color(
                palette.dirt,
                Vec2::new(footprint.visual_width, footprint.visual_height),
            ),
            Transform::from_translation(center.extend(Z_PLATFORM)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite::from_color(palette.grass, Vec2::new(footprint.visual_width, grass_height)),
                Transform::from_xyz(0.0, footprint.offset_y, 0.1),
            ));
        });
}

fn spawn_collectible(commands: &mut Commands, level: u32, pos: Vec2) {
    let half = Vec2::new(COLLECTIBLE_WIDTH, COLLECTIBLE_HEIGHT)
        * COLLECTIBLE_SCALE
        * COLLECTIBLE_COLLISION_FACTOR
        * 0.5;
    commands.spawn((
        Collectible::default(),
        LevelEntity { level },
        RigidBody::Fixed,
        Collider::cuboid(half.x, half.y),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_translation(pos.extend(Z_COLLECTIBLE)),
        Visibility::default(),
    ));
}

fn spawn_goal(commands: &mut Commands, level: u32, pos: Vec2, config: &GameConfig) {
    let half = config.goal_collision_size * 0.5;
    commands.spawn((
        Goal { level },
        LevelEntity { level },
        RigidBody::Fixed,
        Collider::cuboid(half, half),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_translation(pos.extend(Z_GOAL)),
        Visibility::default(),
    ));
    debug!("Goal for level {level} at y = {:.0}", pos.y);
}

fn spawn_backdrop(
    commands: &mut Commands,
    level: u32,
    config: &GameConfig,
    viewport: &Viewport,
    palette: LevelPalette,
) {
    let bottom = config.ground_y - config.ground_height;
    let height = config.world_height() + config.ground_height;
    commands.spawn((
        LevelBackground,
        LevelEntity { level },
        Sprite::from_color(palette.sky, Vec2::new(viewport.width, height)),
        Transform::from_xyz(viewport.width * 0.5, bottom + height * 0.5, Z_BACKGROUND),
    ));

    let grass = PLATFORM_GRASS_HEIGHT.min(config.ground_height);
    commands
        .spawn((
            GroundSkin,
            LevelEntity { level },
            Sprite::from_color(palette.dirt, Vec2::new(viewport.width, config.ground_height)),
            Transform::from_xyz(
                viewport.width * 0.5,
                config.ground_y - config.ground_height * 0.5,
                Z_GROUND,
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite::from_color(palette.grass, Vec2::new(viewport.width, grass)),
                Transform::from_xyz(0.0, (config.ground_height - grass) * 0.5, 0.1),
            ));
        });
}

/// Queue the long-lived session bodies: the ground slab and the two side walls.
pub fn spawn_session_world(commands: &mut Commands, config: &GameConfig, viewport: &Viewport) {
    let half_ground = config.ground_height * 0.5;
    commands.spawn((
        Ground,
        SessionEntity,
        RigidBody::Fixed,
        Collider::cuboid(viewport.width * 0.5 + WALL_THICKNESS, half_ground),
        Transform::from_xyz(viewport.width * 0.5, config.ground_y - half_ground, 0.0),
    ));

    let half_height = config.world_height() * 0.5;
    let half_thickness = WALL_THICKNESS * 0.5;
    for x in [-half_thickness, viewport.width + half_thickness] {
        commands.spawn((
            Wall,
            SessionEntity,
            RigidBody::Fixed,
            Collider::cuboid(half_thickness, half_height),
            Transform::from_xyz(x, config.ground_y + half_height, 0.0),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn footprint_matches_scaled_grass_strip() {
        let cfg = GameConfig::default();
        let f = Footprint::for_width_class(0, &cfg).expect("class 0 exists");
        assert!((f.visual_width - 250.0 * 1.3).abs() < 1e-3);
        assert!((f.width - 250.0 * 1.3 * 0.95).abs() < 1e-3);
        assert!((f.height - 20.0 * 1.3).abs() < 1e-3);
        // Collider top coincides with the sprite top.
        assert!((f.top(0.0) - f.visual_height * 0.5).abs() < 1e-3);
    }

    #[test]
    fn unknown_width_class_has_no_footprint() {
        assert!(Footprint::for_width_class(6, &GameConfig::default()).is_none());
    }

    #[test]
    fn resolved_x_stays_inside_viewport() {
        for i in 0..=100 {
            let spec = PlatformSpec::new(i as f32 / 100.0, 300.0, 2, false);
            let pos = platform_world_position(&spec, 1280.0, 0.0);
            assert!((0.0..=1280.0).contains(&pos.x), "x = {}", pos.x);
        }
    }

    #[test]
    fn y_offset_is_measured_up_from_ground() {
        let spec = PlatformSpec::new(0.5, 300.0, 2, false);
        assert_eq!(platform_world_position(&spec, 1280.0, 50.0).y, 350.0);
    }

    #[test]
    fn full_chance_respects_the_flag() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(should_spawn_collectible(true, 1.0, &mut rng));
        assert!(!should_spawn_collectible(false, 1.0, &mut rng));
        assert!(!should_spawn_collectible(true, 0.0, &mut rng));
    }

    #[test]
    fn full_chance_builds_one_banana_per_flagged_platform() {
        let catalog = LevelCatalog::baked().expect("baked catalog");
        let config = GameConfig::default();
        let viewport = Viewport::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut world = World::new();
        for level in 1..=catalog.len() as u32 {
            let built = build_level(
                &mut world.commands(),
                &catalog,
                &config,
                &viewport,
                level,
                &mut rng,
            );
            let definition = catalog.level(level);
            assert_eq!(built.platforms, definition.platforms.len(), "level {level}");
            assert_eq!(
                built.collectibles,
                definition.flagged_collectibles(),
                "level {level}"
            );
        }
        world.flush();
        let mut q = world.query_filtered::<(), With<Collectible>>();
        let total: usize = (1..=catalog.len() as u32)
            .map(|n| catalog.level(n).flagged_collectibles())
            .sum();
        assert_eq!(q.iter(&world).count(), total);
    }

    #[test]
    fn platforms_request_contact_modification() {
        let mut world = World::new();
        let footprint = Footprint::for_width_class(2, &GameConfig::default()).expect("class 2");
        let palette = LevelCatalog::baked().expect("baked catalog").palette(1);
        spawn_platform(&mut world.commands(), 1, Vec2::new(640.0, 300.0), footprint, palette);
        world.flush();
        let mut q = world.query_filtered::<&ActiveHooks, With<Platform>>();
        let hooks = q.single(&world).expect("one platform");
        assert!(hooks.contains(ActiveHooks::FILTER_CONTACT_PAIRS));
        assert!(hooks.contains(ActiveHooks::MODIFY_SOLVER_CONTACTS));
    }

    #[test]
    fn partial_chance_spawns_some_but_not_all() {
        let mut rng = StdRng::seed_from_u64(42);
        let spawned = (0..1000)
            .filter(|_| should_spawn_collectible(true, 0.7, &mut rng))
            .count();
        assert!((600..800).contains(&spawned), "spawned {spawned} of 1000");
    }
}
