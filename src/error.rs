//! Game-specific error types.
//!
//! Only configuration problems surface as errors.  Stale-reference situations
//! (collision events naming a despawned entity, a banana overlapped twice) are
//! absorbed locally as no-ops and never become a `GameError`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::error::GameResult;
//!
//! fn startup() -> GameResult<()> {
//!     let catalog = LevelCatalog::new(levels)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for Banana Party.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The level catalog contains no levels at all.
    EmptyCatalog,

    /// A level definition has no platforms.
    EmptyLevel {
        /// 1-based level number.
        level: u32,
    },

    /// A platform field is outside its valid range.
    PlatformOutOfRange {
        /// 1-based level number.
        level: u32,
        /// Index of the platform inside its level.
        index: usize,
        /// Name of the offending field (for logging).
        field: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },

    /// A platform names a width-class with no footprint.
    UnknownWidthClass {
        level: u32,
        index: usize,
        width_class: u8,
    },

    /// A level's goal height is not a positive finite number.
    InvalidGoalHeight { level: u32, value: f32 },

    /// A tunable is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// `assets/game.toml` is not valid TOML or has a mistyped key.
    ConfigParse {
        /// Parser message, including line and column.
        message: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::EmptyCatalog => write!(f, "level catalog is empty"),
            GameError::EmptyLevel { level } => {
                write!(f, "level {} has no platforms", level)
            }
            GameError::PlatformOutOfRange {
                level,
                index,
                field,
                value,
                expected,
            } => write!(
                f,
                "level {} platform {}: {} = {} is outside {}",
                level, index, field, value, expected
            ),
            GameError::UnknownWidthClass {
                level,
                index,
                width_class,
            } => write!(
                f,
                "level {} platform {}: unknown width class {}",
                level, index, width_class
            ),
            GameError::InvalidGoalHeight { level, value } => write!(
                f,
                "level {} goal height {} must be positive and finite",
                level, value
            ),
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            GameError::ConfigParse { message } => {
                write!(f, "config parse error: {}", message)
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in `[0.0, 1.0]`.
pub fn validate_unit_interval(name: &'static str, value: f32) -> GameResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}
