//! Banana Party game library
//!
//! A vertical-climbing platformer: hop up one-way platforms, pick up bananas
//! and touch the goal to move on to the next of ten hand-made levels.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod grounded;
pub mod hud;
pub mod level;
pub mod menu;
pub mod one_way;
pub mod player;
pub mod rendering;
