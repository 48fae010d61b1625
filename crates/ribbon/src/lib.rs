//! Ribbon stroke synthesis for tracked-controller drawing
//!
//! This crate turns a stream of controller samples into triangle-strip
//! ribbon geometry, one fixed-capacity segment at a time:
//! - [`segment`] - Position/normal/UV storage, cursors and draw range
//! - [`synth`] - Sample spacing, rung emission and smoothed normals
//! - [`policy`] - Pressure-driven or constant thickness and UVs
//! - [`material`] - Per-mesh color and animation state
//! - [`brush`] - The brush interface drawing tools use
//! - [`validation`] - Config checks and error types

pub mod brush;
pub mod constants;
pub mod material;
#[cfg(feature = "bevy")]
pub mod mesh;
pub mod policy;
pub mod segment;
pub mod synth;
pub mod types;
pub mod validation;

pub use brush::*;
pub use constants::*;
pub use material::*;
pub use policy::*;
pub use segment::*;
pub use synth::*;
pub use types::*;
pub use validation::*;

pub use ribbon_config::BrushConfig;
