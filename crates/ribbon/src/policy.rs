//! Thickness and UV rules for a ribbon brush
//!
//! A brush picks one of two policies when it is built and keeps it for its
//! whole life:
//! - [`ThicknessPolicy::Pressure`] scales the ribbon by trigger pressure,
//!   damped by how much the pressure jumped since the previous sample, and
//!   uses the pressure itself as the U coordinate.
//! - [`ThicknessPolicy::Constant`] keeps the configured width and spreads
//!   U evenly over the rungs written so far, bounded by the spread setting.

use crate::constants::{PRESSURE_CLAMP, UV_FLOATS_PER_RUNG};

/// Result of feeding one pressure value through the smoother
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureStep {
    /// Pressure capped at [`PRESSURE_CLAMP`]
    pub clamped: f32,
    /// `1 - |previous - clamped|`; 1.0 when pressure did not change
    pub smoothing: f32,
}

impl PressureStep {
    /// Factor applied to the base thickness
    pub fn scale(&self) -> f32 {
        self.clamped * self.smoothing * self.smoothing
    }
}

/// Remembers the previous clamped pressure to damp thickness jitter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressureSmoother {
    previous: f32,
}

impl PressureSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp `pressure`, compute the smoothing factor against the previous
    /// sample, and remember the clamped value
    pub fn step(&mut self, pressure: f32) -> PressureStep {
        let clamped = pressure.min(PRESSURE_CLAMP);
        let smoothing = 1.0 - (self.previous - clamped).abs();
        self.previous = clamped;
        PressureStep { clamped, smoothing }
    }

    pub fn previous(&self) -> f32 {
        self.previous
    }
}

/// Thickness/UV rule, selected once from `enable_pressure`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThicknessPolicy {
    Pressure(PressureSmoother),
    Constant,
}

impl ThicknessPolicy {
    pub fn from_pressure_flag(enable_pressure: bool) -> Self {
        if enable_pressure {
            ThicknessPolicy::Pressure(PressureSmoother::new())
        } else {
            ThicknessPolicy::Constant
        }
    }

    pub fn is_pressure_driven(&self) -> bool {
        matches!(self, ThicknessPolicy::Pressure(_))
    }

    /// Offset length for this sample given the brush's base half-width
    pub fn thickness(&mut self, base: f32, pressure: f32) -> f32 {
        match self {
            ThicknessPolicy::Pressure(smoother) => base * smoother.step(pressure).scale(),
            ThicknessPolicy::Constant => base,
        }
    }

    /// Write the UVs for the rung about to be emitted
    ///
    /// `uv_cursor` is the segment's UV float cursor and `max` the spread
    /// denominator chosen by the synthesizer.
    pub fn write_uvs(&self, uvs: &mut [f32], uv_cursor: usize, max: usize, pressure: f32) {
        match self {
            ThicknessPolicy::Pressure(_) => {
                uvs[uv_cursor..uv_cursor + UV_FLOATS_PER_RUNG]
                    .copy_from_slice(&[pressure, 0.0, pressure, 1.0]);
            }
            ThicknessPolicy::Constant => write_spread_uvs(uvs, max),
        }
    }
}

/// Rewrite the UV prefix as `(i / max, 0), (i / max, 1)` for `i` in `0..=max`
///
/// This touches `max + 1` rungs on every call, so a long unbounded stroke
/// costs quadratic time overall. Rungs that do not fit in `uvs` are skipped.
pub fn write_spread_uvs(uvs: &mut [f32], max: usize) {
    let denominator = max.max(1) as f32;
    for (i, rung) in uvs
        .chunks_exact_mut(UV_FLOATS_PER_RUNG)
        .take(max + 1)
        .enumerate()
    {
        let u = i as f32 / denominator;
        rung.copy_from_slice(&[u, 0.0, u, 1.0]);
    }
}
