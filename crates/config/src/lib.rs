//! Shared brush configuration for ribbon strokes
//!
//! This crate provides the single source of truth for the options a ribbon
//! brush is constructed from: sample spacing, thickness, pressure mode,
//! UV spread and segment capacity. It is shared between the synthesis engine
//! and whatever tool layer picks brushes for the user.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default minimum distance between two accepted samples (world units)
pub const DEFAULT_DELTA: f32 = 0.002;

/// Default full brush width (world units). Half of it is the ribbon offset.
pub const DEFAULT_BRUSH_THICKNESS: f32 = 0.1;

/// Default UV spread bound in rungs (0 = unbounded)
pub const DEFAULT_MAX_SPREAD: u32 = 20;

/// Default segment capacity in rungs (one rung = two vertices)
pub const DEFAULT_CAPACITY_RUNGS: usize = 10_000;

/// Default brush color as 0xRRGGBB
pub const DEFAULT_COLOR: u32 = 0x808080;

/// Material used by brushes that do not sample a texture
pub const UNTEXTURED_MATERIAL: &str = "material_without_tex";

/// Material used by brushes that sample a texture along the ribbon
pub const TEXTURED_MATERIAL: &str = "material_with_tex";

/// Construction options for a ribbon brush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct BrushConfig {
    /// Minimum spacing between consecutive accepted samples
    pub delta: f32,
    /// Full brush width; the constant thickness is half of this
    pub brush_thickness: f32,
    /// Use the pressure-driven thickness/UV policy
    pub enable_pressure: bool,
    /// UV progression bound in rungs for the constant policy (0 = unbounded)
    pub max_spread: u32,
    /// Rungs per segment before the caller must start a new mesh
    pub capacity_rungs: usize,
    /// Material color as 0xRRGGBB
    pub color: u32,
    /// Identifier of the material the renderer binds
    pub material_id: String,
    /// Whether the material carries a color at all
    pub material_has_color: bool,
    /// Whether the material is animated (time advanced by `update`)
    pub animated: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            brush_thickness: DEFAULT_BRUSH_THICKNESS,
            enable_pressure: true,
            max_spread: DEFAULT_MAX_SPREAD,
            capacity_rungs: DEFAULT_CAPACITY_RUNGS,
            color: DEFAULT_COLOR,
            material_id: UNTEXTURED_MATERIAL.to_string(),
            material_has_color: true,
            animated: false,
        }
    }
}

impl BrushConfig {
    /// Constant-width ribbon with a texture stretched over `max_spread` rungs
    pub fn textured_ribbon() -> Self {
        Self {
            brush_thickness: 0.5,
            enable_pressure: false,
            material_id: TEXTURED_MATERIAL.to_string(),
            ..Default::default()
        }
    }

    /// Pressure-driven ribbon in a dark bark brown
    pub fn pressure_ribbon() -> Self {
        Self {
            brush_thickness: 0.2,
            enable_pressure: true,
            color: 0x45220a,
            ..Default::default()
        }
    }

    /// Shader-driven ribbon whose material time advances every frame
    pub fn animated_ribbon() -> Self {
        Self {
            material_id: "material_test_shader".to_string(),
            material_has_color: false,
            animated: true,
            ..Default::default()
        }
    }

    /// Set the minimum sample spacing
    pub fn with_delta(mut self, delta: f32) -> Self {
        self.delta = delta;
        self
    }

    /// Set the segment capacity in rungs
    pub fn with_capacity(mut self, capacity_rungs: usize) -> Self {
        self.capacity_rungs = capacity_rungs;
        self
    }

    /// Set the UV spread bound
    pub fn with_max_spread(mut self, max_spread: u32) -> Self {
        self.max_spread = max_spread;
        self
    }

    /// Half the brush width, the offset applied on each side of a sample
    pub fn half_thickness(&self) -> f32 {
        self.brush_thickness / 2.0
    }

    /// Color as normalized RGBA with full alpha
    pub fn color_rgba(&self) -> [f32; 4] {
        hex_to_rgba(self.color)
    }
}

/// Convert a 0xRRGGBB color to normalized RGBA with full alpha
pub fn hex_to_rgba(hex: u32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}
