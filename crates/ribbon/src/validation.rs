use ribbon_config::BrushConfig;
use thiserror::Error;

use crate::brush::MeshHandle;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid sample spacing: {0} (must be finite and >= 0)")]
    InvalidDelta(f32),
    #[error("Invalid brush thickness: {0} (must be finite and >= 0)")]
    InvalidThickness(f32),
    #[error("Segment capacity must hold at least one rung")]
    ZeroCapacity,
    #[error("Material id is empty")]
    EmptyMaterialId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrokeError {
    #[error("No active mesh: call create_mesh before add_point")]
    NoActiveMesh,
    #[error("Unknown mesh handle: {0:?}")]
    UnknownMesh(MeshHandle),
}

/// Check a thickness value (full width or half width)
pub fn validate_thickness(thickness: f32) -> Result<(), ConfigError> {
    if !thickness.is_finite() || thickness < 0.0 {
        return Err(ConfigError::InvalidThickness(thickness));
    }
    Ok(())
}

/// Validate a brush config before building a brush from it
pub fn validate_config(config: &BrushConfig) -> Result<(), ConfigError> {
    if !config.delta.is_finite() || config.delta < 0.0 {
        return Err(ConfigError::InvalidDelta(config.delta));
    }

    validate_thickness(config.brush_thickness)?;

    if config.capacity_rungs == 0 {
        return Err(ConfigError::ZeroCapacity);
    }

    if config.material_id.is_empty() {
        return Err(ConfigError::EmptyMaterialId);
    }

    // max_spread is unsigned and 0 means unbounded, so every value is valid

    Ok(())
}
