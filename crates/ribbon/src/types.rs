use glam::{Quat, Vec3};

/// One input record from the tracked controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// World-space position of the brush tip
    pub position: Vec3,
    /// Controller orientation; rotates the rung axis
    pub orientation: Quat,
    /// Trigger pressure in [0, 1]
    pub pressure: f32,
}

impl Sample {
    pub fn new(position: Vec3, orientation: Quat, pressure: f32) -> Self {
        Self {
            position,
            orientation,
            pressure,
        }
    }
}

/// What `add_point` did with a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// A rung was written; carries the index of the new rung
    Accepted { rung: usize },
    /// The sample was closer than `delta` to the last accepted one
    Rejected,
}

impl SampleOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SampleOutcome::Accepted { .. })
    }
}

/// Last accepted position of the current segment
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LastAccepted {
    /// Nothing accepted yet; the next sample always passes the spacing test
    #[default]
    NotYetSet,
    At(Vec3),
}

impl LastAccepted {
    /// Whether `position` is far enough from the last accepted sample
    ///
    /// Only a definite `distance < delta` rejects, so a non-finite position
    /// is accepted and propagates into the geometry.
    #[inline]
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn admits(&self, position: Vec3, delta: f32) -> bool {
        match self {
            LastAccepted::NotYetSet => true,
            LastAccepted::At(last) => !(last.distance(position) < delta),
        }
    }
}

/// Active vertex range handed to the renderer, `[start, start + count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub start: usize,
    pub count: usize,
}

impl DrawRange {
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Which attribute arrays changed since the renderer last uploaded them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyAttributes {
    pub position: bool,
    pub normal: bool,
    pub uv: bool,
}

impl DirtyAttributes {
    pub const ALL: Self = Self {
        position: true,
        normal: true,
        uv: true,
    };

    pub fn any(&self) -> bool {
        self.position || self.normal || self.uv
    }
}

/// Color picked by the user, each component in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Convert to RGBA with full alpha. Hue wraps around.
    pub fn to_rgba(&self) -> [f32; 4] {
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);
        let h = self.h.rem_euclid(1.0) * 6.0;

        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [r + m, g + m, b + m, 1.0]
    }

    /// Convert to RGBA reading the third component as HSL lightness
    ///
    /// This is how brush colors are applied: the picker's `v` acts as
    /// lightness, so `(h, 1, 0.5)` is the pure hue and `(h, s, 1)` is white.
    pub fn to_hsl_rgba(&self) -> [f32; 4] {
        let s = self.s.clamp(0.0, 1.0);
        let l = self.v.clamp(0.0, 1.0);
        let h = self.h.rem_euclid(1.0);

        if s == 0.0 {
            return [l, l, l, 1.0];
        }

        let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let low = 2.0 * l - high;

        [
            hue_to_channel(low, high, h + 1.0 / 3.0),
            hue_to_channel(low, high, h),
            hue_to_channel(low, high, h - 1.0 / 3.0),
            1.0,
        ]
    }
}

fn hue_to_channel(low: f32, high: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgba(actual: [f32; 4], expected: [f32; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_hsv_primaries() {
        assert_rgba(Hsv::new(0.0, 1.0, 1.0).to_rgba(), [1.0, 0.0, 0.0, 1.0]);
        assert_rgba(Hsv::new(1.0 / 3.0, 1.0, 1.0).to_rgba(), [0.0, 1.0, 0.0, 1.0]);
        assert_rgba(Hsv::new(2.0 / 3.0, 1.0, 1.0).to_rgba(), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_hsv_grey_and_wrap() {
        assert_rgba(Hsv::new(0.4, 0.0, 0.5).to_rgba(), [0.5, 0.5, 0.5, 1.0]);
        assert_rgba(Hsv::new(1.0, 1.0, 1.0).to_rgba(), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hsl_lightness() {
        assert_rgba(Hsv::new(0.0, 1.0, 1.0).to_hsl_rgba(), [1.0, 1.0, 1.0, 1.0]);
        assert_rgba(Hsv::new(0.0, 1.0, 0.5).to_hsl_rgba(), [1.0, 0.0, 0.0, 1.0]);
        assert_rgba(Hsv::new(0.0, 1.0, 0.0).to_hsl_rgba(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hsl_hues_and_grey() {
        assert_rgba(Hsv::new(1.0 / 3.0, 1.0, 0.5).to_hsl_rgba(), [0.0, 1.0, 0.0, 1.0]);
        assert_rgba(Hsv::new(2.0 / 3.0, 1.0, 0.5).to_hsl_rgba(), [0.0, 0.0, 1.0, 1.0]);
        assert_rgba(Hsv::new(0.0, 1.0, 0.25).to_hsl_rgba(), [0.5, 0.0, 0.0, 1.0]);
        assert_rgba(Hsv::new(0.7, 0.0, 0.3).to_hsl_rgba(), [0.3, 0.3, 0.3, 1.0]);
    }

    #[test]
    fn test_last_accepted_admits() {
        let unset = LastAccepted::NotYetSet;
        assert!(unset.admits(Vec3::ZERO, f32::MAX));

        let last = LastAccepted::At(Vec3::ZERO);
        assert!(!last.admits(Vec3::new(0.05, 0.0, 0.0), 0.1));
        assert!(last.admits(Vec3::new(0.1, 0.0, 0.0), 0.1));
    }

    #[test]
    fn test_last_accepted_admits_nan() {
        let last = LastAccepted::At(Vec3::ZERO);
        assert!(last.admits(Vec3::new(f32::NAN, 0.0, 0.0), 0.1));

        let poisoned = LastAccepted::At(Vec3::splat(f32::NAN));
        assert!(poisoned.admits(Vec3::ZERO, 0.1));
    }
}
