//! Baked level data.
//!
//! Every level is a goal height plus an ordered list of [`PlatformSpec`]s.
//! Platform X is a fraction of the viewport width resolved at spawn time; Y is
//! an offset upward from the ground line.  Levels beyond the catalog length
//! wrap, so level 11 plays level 1's layout.

use crate::constants::{LEVEL_GOAL_HEIGHT, PLATFORM_WIDTHS};
use crate::error::{GameError, GameResult};
use bevy::prelude::*;

/// One platform placement inside a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformSpec {
    /// Horizontal position as a fraction of the viewport width, `[0, 1]`.
    pub x_factor: f32,
    /// Height of the platform centre above the ground line.
    pub y_offset: f32,
    /// Index into [`PLATFORM_WIDTHS`].
    pub width_class: u8,
    /// Whether a banana sits on this platform.
    pub has_collectible: bool,
}

impl PlatformSpec {
    pub const fn new(x_factor: f32, y_offset: f32, width_class: u8, has_collectible: bool) -> Self {
        Self {
            x_factor,
            y_offset,
            width_class,
            has_collectible,
        }
    }
}

/// Static description of a single level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDefinition {
    pub goal_height: f32,
    pub platforms: Vec<PlatformSpec>,
}

impl LevelDefinition {
    /// Number of platforms that carry a collectible flag.
    pub fn flagged_collectibles(&self) -> usize {
        self.platforms.iter().filter(|p| p.has_collectible).count()
    }
}

/// Sky, grass and dirt colours for one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPalette {
    pub sky: Color,
    pub grass: Color,
    pub dirt: Color,
}

impl LevelPalette {
    /// Build a palette from packed `0xRRGGBB` values.
    pub fn from_hex(sky: u32, grass: u32, dirt: u32) -> Self {
        Self {
            sky: hex_color(sky),
            grass: hex_color(grass),
            dirt: hex_color(dirt),
        }
    }
}

fn hex_color(rgb: u32) -> Color {
    Color::srgb_u8(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    )
}

/// Validated, immutable level catalog.
#[derive(Resource, Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
    palettes: Vec<LevelPalette>,
}

impl LevelCatalog {
    /// Build a catalog, rejecting malformed level data.
    ///
    /// An empty palette list falls back to a single neutral palette.
    pub fn new(levels: Vec<LevelDefinition>, palettes: Vec<LevelPalette>) -> GameResult<Self> {
        if levels.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        for (i, level) in levels.iter().enumerate() {
            validate_level(i as u32 + 1, level)?;
        }
        let palettes = if palettes.is_empty() {
            vec![LevelPalette::from_hex(0x87CEEB, 0x7CB342, 0x654321)]
        } else {
            palettes
        };
        Ok(Self { levels, palettes })
    }

    /// The ten shipped levels and their palettes.
    pub fn baked() -> GameResult<Self> {
        Self::new(baked_levels(), baked_palettes())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Definition for 1-based `level`, wrapping past the end of the catalog.
    pub fn level(&self, level: u32) -> &LevelDefinition {
        &self.levels[self.wrap_index(level, self.levels.len())]
    }

    /// Palette for 1-based `level`, wrapping independently of the level list.
    pub fn palette(&self, level: u32) -> LevelPalette {
        self.palettes[self.wrap_index(level, self.palettes.len())]
    }

    fn wrap_index(&self, level: u32, len: usize) -> usize {
        (level.max(1) as usize - 1) % len
    }
}

fn validate_level(level: u32, def: &LevelDefinition) -> GameResult<()> {
    if !def.goal_height.is_finite() || def.goal_height <= 0.0 {
        return Err(GameError::InvalidGoalHeight {
            level,
            value: def.goal_height,
        });
    }
    if def.platforms.is_empty() {
        return Err(GameError::EmptyLevel { level });
    }
    for (index, p) in def.platforms.iter().enumerate() {
        if !(0.0..=1.0).contains(&p.x_factor) {
            return Err(GameError::PlatformOutOfRange {
                level,
                index,
                field: "x_factor",
                value: p.x_factor,
                expected: "[0.0, 1.0]",
            });
        }
        if !p.y_offset.is_finite() || p.y_offset <= 0.0 {
            return Err(GameError::PlatformOutOfRange {
                level,
                index,
                field: "y_offset",
                value: p.y_offset,
                expected: "(0.0, ∞)",
            });
        }
        if p.width_class as usize >= PLATFORM_WIDTHS.len() {
            return Err(GameError::UnknownWidthClass {
                level,
                index,
                width_class: p.width_class,
            });
        }
    }
    Ok(())
}

// ── Baked data ────────────────────────────────────────────────────────────────

const fn p(x: f32, y: f32, w: u8, banana: bool) -> PlatformSpec {
    PlatformSpec::new(x, y, w, banana)
}

const LEVEL_1: &[PlatformSpec] = &[
    p(0.5, 200.0, 1, true),
    p(0.4, 500.0, 2, false),
    p(0.6, 800.0, 1, true),
    p(0.5, 1100.0, 3, false),
    p(0.35, 1400.0, 2, true),
    p(0.65, 1700.0, 1, false),
    p(0.5, 2000.0, 4, true),
    p(0.4, 2300.0, 2, false),
    p(0.6, 2600.0, 3, true),
    p(0.45, 2900.0, 1, false),
    p(0.5, 3200.0, 5, false),
];

const LEVEL_2: &[PlatformSpec] = &[
    p(0.5, 250.0, 1, true),
    p(0.2, 550.0, 2, false),
    p(0.8, 850.0, 1, true),
    p(0.5, 1150.0, 3, false),
    p(0.1, 1450.0, 2, true),
    p(0.9, 1750.0, 3, false),
    p(0.3, 2050.0, 4, true),
    p(0.7, 2350.0, 2, false),
    p(0.5, 2650.0, 3, true),
    p(0.5, 2950.0, 5, false),
];

const LEVEL_3: &[PlatformSpec] = &[
    p(0.5, 300.0, 2, true),
    p(0.3, 600.0, 3, false),
    p(0.7, 900.0, 2, true),
    p(0.5, 1200.0, 4, false),
    p(0.2, 1500.0, 3, true),
    p(0.8, 1800.0, 4, false),
    p(0.4, 2100.0, 3, true),
    p(0.6, 2400.0, 4, false),
    p(0.5, 2700.0, 5, false),
];

const LEVEL_4: &[PlatformSpec] = &[
    p(0.5, 350.0, 3, true),
    p(0.2, 650.0, 4, false),
    p(0.8, 950.0, 3, true),
    p(0.5, 1250.0, 5, false),
    p(0.1, 1550.0, 4, true),
    p(0.9, 1850.0, 5, false),
    p(0.3, 2150.0, 4, true),
    p(0.5, 2450.0, 5, false),
];

const LEVEL_5: &[PlatformSpec] = &[
    p(0.5, 200.0, 2, true),
    p(0.3, 500.0, 3, false),
    p(0.7, 800.0, 4, true),
    p(0.5, 1100.0, 2, false),
    p(0.4, 1400.0, 5, true),
    p(0.6, 1700.0, 3, false),
    p(0.2, 2000.0, 4, true),
    p(0.8, 2300.0, 2, false),
    p(0.5, 2600.0, 5, true),
    p(0.5, 2900.0, 5, false),
];

const LEVEL_6: &[PlatformSpec] = &[
    p(0.5, 250.0, 3, true),
    p(0.2, 550.0, 4, false),
    p(0.8, 850.0, 5, true),
    p(0.1, 1150.0, 3, false),
    p(0.9, 1450.0, 4, true),
    p(0.3, 1750.0, 5, false),
    p(0.7, 2050.0, 2, true),
    p(0.4, 2350.0, 4, false),
    p(0.6, 2650.0, 5, true),
    p(0.5, 2950.0, 5, false),
];

const LEVEL_7: &[PlatformSpec] = &[
    p(0.5, 200.0, 4, true),
    p(0.3, 500.0, 5, false),
    p(0.7, 800.0, 3, true),
    p(0.2, 1100.0, 4, false),
    p(0.8, 1400.0, 5, true),
    p(0.4, 1700.0, 2, false),
    p(0.6, 2000.0, 4, true),
    p(0.1, 2300.0, 5, false),
    p(0.9, 2600.0, 3, true),
    p(0.5, 2900.0, 5, false),
];

const LEVEL_8: &[PlatformSpec] = &[
    p(0.5, 250.0, 3, true),
    p(0.4, 550.0, 4, false),
    p(0.6, 850.0, 5, true),
    p(0.3, 1150.0, 2, false),
    p(0.7, 1450.0, 4, true),
    p(0.2, 1750.0, 5, false),
    p(0.8, 2050.0, 3, true),
    p(0.5, 2350.0, 4, false),
    p(0.5, 2650.0, 5, true),
    p(0.5, 2950.0, 5, false),
];

const LEVEL_9: &[PlatformSpec] = &[
    p(0.5, 300.0, 2, true),
    p(0.2, 600.0, 5, false),
    p(0.8, 900.0, 3, true),
    p(0.1, 1200.0, 4, false),
    p(0.9, 1500.0, 2, true),
    p(0.3, 1800.0, 5, false),
    p(0.7, 2100.0, 4, true),
    p(0.4, 2400.0, 3, false),
    p(0.6, 2700.0, 5, true),
    p(0.5, 3000.0, 5, false),
];

const LEVEL_10: &[PlatformSpec] = &[
    p(0.5, 350.0, 5, true),
    p(0.1, 650.0, 4, false),
    p(0.9, 950.0, 3, true),
    p(0.2, 1250.0, 5, false),
    p(0.8, 1550.0, 2, true),
    p(0.3, 1850.0, 4, false),
    p(0.7, 2150.0, 5, true),
    p(0.4, 2450.0, 3, false),
    p(0.6, 2750.0, 5, true),
    p(0.5, 3050.0, 5, false),
];

/// Layouts for the shipped levels, in play order.
pub fn baked_levels() -> Vec<LevelDefinition> {
    [
        LEVEL_1, LEVEL_2, LEVEL_3, LEVEL_4, LEVEL_5, LEVEL_6, LEVEL_7, LEVEL_8, LEVEL_9, LEVEL_10,
    ]
    .iter()
    .map(|platforms| LevelDefinition {
        goal_height: LEVEL_GOAL_HEIGHT,
        platforms: platforms.to_vec(),
    })
    .collect()
}

/// One palette per shipped level: (sky, grass, dirt).
pub fn baked_palettes() -> Vec<LevelPalette> {
    [
        (0x87CEEB, 0x7CB342, 0x654321),
        (0xFFB6C1, 0x90EE90, 0x8B4513),
        (0xFFE4B5, 0x98FB98, 0xA0522D),
        (0xE0E0E0, 0xC0C0C0, 0x696969),
        (0xFF69B4, 0xFFB6C1, 0x8B008B),
        (0x00CED1, 0x7FFFD4, 0x008B8B),
        (0xFF6B6B, 0xFF4757, 0xC92A2A),
        (0x9B59B6, 0x8E44AD, 0x6C3483),
        (0x3498DB, 0x2980B9, 0x1F618D),
        (0xF39C12, 0xE67E22, 0xD35400),
    ]
    .iter()
    .map(|&(sky, grass, dirt)| LevelPalette::from_hex(sky, grass, dirt))
    .collect()
}
