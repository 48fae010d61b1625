use glam::Vec3;

/// Position floats written per accepted sample (2 vertices x 3 floats).
pub const FLOATS_PER_RUNG: usize = 6;

/// UV floats written per accepted sample (2 vertices x 2 floats).
pub const UV_FLOATS_PER_RUNG: usize = 4;

/// Vertices emitted per accepted sample.
pub const VERTICES_PER_RUNG: usize = 2;

/// Copies of the smoothed normal written per update.
pub const NORMAL_COPIES: usize = 6;

/// Largest number of trailing triangles averaged into one normal.
pub const NORMAL_WINDOW: usize = 3;

/// Pressure above this value no longer widens the stroke.
pub const PRESSURE_CLAMP: f32 = 0.8;

/// Axis rotated by the sample orientation to get the rung direction.
pub const RUNG_AXIS: Vec3 = Vec3::X;

/// Animation time added to animated materials on every `update`.
pub const ANIMATION_TIME_STEP: f32 = 0.01;
