//! Ribbon synthesis from controller samples
//!
//! Every accepted sample becomes one rung: two vertices placed symmetrically
//! around the sample along the controller's rotated X axis. Consecutive rungs
//! form a triangle strip. After each rung the synthesizer averages the normals
//! of the last few strip triangles and writes the result over the newest rung
//! pair, which keeps shading continuous across rung boundaries.

use glam::Vec3;
use tracing::trace;

use crate::constants::{NORMAL_WINDOW, RUNG_AXIS, VERTICES_PER_RUNG};
use crate::policy::ThicknessPolicy;
use crate::segment::StrokeSegment;
use crate::types::{Sample, SampleOutcome};

/// Turns samples into rungs, normals and UVs inside a [`StrokeSegment`]
#[derive(Debug, Clone)]
pub struct RibbonSynthesizer {
    /// Minimum distance between accepted samples
    delta: f32,
    /// Base offset from the sample to each rung vertex
    half_thickness: f32,
    /// UV spread bound in rungs (0 = unbounded)
    max_spread: usize,
    policy: ThicknessPolicy,
    /// Reused when the trailing triangles are degenerate
    last_normal: Vec3,
}

impl RibbonSynthesizer {
    pub fn new(delta: f32, half_thickness: f32, max_spread: usize, policy: ThicknessPolicy) -> Self {
        Self {
            delta,
            half_thickness,
            max_spread,
            policy,
            last_normal: Vec3::Z,
        }
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn half_thickness(&self) -> f32 {
        self.half_thickness
    }

    pub fn set_half_thickness(&mut self, half_thickness: f32) {
        self.half_thickness = half_thickness;
    }

    pub fn policy(&self) -> &ThicknessPolicy {
        &self.policy
    }

    /// Process one sample against `segment`
    ///
    /// Samples closer than `delta` to the segment's last accepted sample are
    /// rejected without touching the segment. Panics if the segment cannot
    /// take another rung.
    pub fn add_point(&mut self, segment: &mut StrokeSegment, sample: Sample) -> SampleOutcome {
        if !segment.last_accepted().admits(sample.position, self.delta) {
            return SampleOutcome::Rejected;
        }
        assert!(
            segment.is_writable(),
            "add_point on a full or sealed segment ({} of {} rungs)",
            segment.rung_count(),
            segment.capacity_rungs()
        );

        let rung = segment.rung_count();
        let max = self.spread_bound(rung);
        let uv_cursor = segment.uv_count();
        self.policy
            .write_uvs(segment.uvs_mut(), uv_cursor, max, sample.pressure);

        let thickness = self.policy.thickness(self.half_thickness, sample.pressure);
        let offset = (sample.orientation * RUNG_AXIS) * thickness;
        segment.push_rung(sample.position - offset, sample.position + offset);

        if segment.vertices_written() >= 2 * VERTICES_PER_RUNG {
            let normal = trailing_normal(segment.positions(), segment.vertices_written())
                .unwrap_or(self.last_normal);
            self.last_normal = normal;
            segment.write_smoothed_normal(normal);
        }

        segment.advance_uv_cursor();
        segment.commit(segment.vertices_written());
        segment.set_last_accepted(sample.position);

        trace!(
            "RibbonSynthesizer::add_point: rung {} at {:?}, thickness={:.4}",
            rung, sample.position, thickness
        );

        SampleOutcome::Accepted { rung }
    }

    /// UV denominator for the rung about to be written
    ///
    /// The configured spread holds until the stroke outgrows it, after which
    /// it follows the rung index. An unbounded spread always follows it.
    pub fn spread_bound(&self, rung: usize) -> usize {
        if self.max_spread == 0 {
            rung
        } else {
            self.max_spread.max(rung)
        }
    }
}

/// Number of trailing strip triangles averaged for a segment holding
/// `vertices` vertices: 1 with two rungs, 2 with three, 3 from then on
pub fn normal_window(vertices: usize) -> usize {
    (vertices / VERTICES_PER_RUNG)
        .saturating_sub(1)
        .min(NORMAL_WINDOW)
}

/// Average normal of the last few strip triangles, normalized
///
/// Triangle `t` back from the end spans vertices `n-3-t`, `n-2-t`, `n-1-t`.
/// Strip triangles alternate winding. `(v0 - v1) x (v2 - v1)` points to the
/// strip's front face (the counter-clockwise side of its first triangle) for
/// triangles starting on an odd vertex, and away from it for even ones, so
/// the even-start products are negated before summing.
/// Returns `None` when the triangles are degenerate.
pub fn trailing_normal(positions: &[f32], vertices: usize) -> Option<Vec3> {
    let window = normal_window(vertices);
    if window == 0 {
        return None;
    }

    let vertex = |i: usize| Vec3::from_slice(&positions[i * 3..i * 3 + 3]);

    let mut sum = Vec3::ZERO;
    for t in 0..window {
        let first = vertices - 3 - t;
        let v0 = vertex(first);
        let v1 = vertex(first + 1);
        let v2 = vertex(first + 2);

        let n = (v0 - v1).cross(v2 - v1);
        sum += if first % 2 == 1 { n } else { -n };
    }

    (sum / window as f32).try_normalize()
}
