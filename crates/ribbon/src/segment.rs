//! Fixed-capacity geometry storage for one ribbon segment
//!
//! A segment owns the position, normal and UV arrays a renderer binds as a
//! triangle strip. Storage is allocated once, zero-filled, and never grows:
//! the synthesizer writes into it through cursors and the owning brush starts
//! a new segment when this one is full.

use tracing::debug;

use crate::constants::{FLOATS_PER_RUNG, NORMAL_COPIES, UV_FLOATS_PER_RUNG, VERTICES_PER_RUNG};
use crate::types::{DirtyAttributes, DrawRange, LastAccepted};

/// Position/normal/UV buffers for one mesh segment
#[derive(Debug, Clone)]
pub struct StrokeSegment {
    /// Vertex positions, 3 floats per vertex
    positions: Vec<f32>,
    /// Vertex normals, 3 floats per vertex
    normals: Vec<f32>,
    /// Texture coordinates, 2 floats per vertex
    uvs: Vec<f32>,
    /// Maximum number of rungs this segment can hold
    capacity_rungs: usize,
    /// Position floats written so far (multiple of 6)
    vertex_count: usize,
    /// Start of the next smoothed-normal write, in floats
    normal_count: usize,
    /// UV floats accounted for so far (multiple of 4)
    uv_count: usize,
    /// Active range handed to the renderer
    draw_range: DrawRange,
    /// Attributes changed since the last `take_dirty`
    dirty: DirtyAttributes,
    /// Last accepted sample position, for the spacing test
    last_accepted: LastAccepted,
    /// No further writes once set
    sealed: bool,
    disposed: bool,
}

impl StrokeSegment {
    /// Allocate zeroed storage for `capacity_rungs` rungs
    ///
    /// Cursors start at zero and the spacing sentinel is unset, so the first
    /// sample written into a fresh segment is always accepted.
    pub fn allocate(capacity_rungs: usize) -> Self {
        let vertices = capacity_rungs * VERTICES_PER_RUNG;
        debug!(
            "StrokeSegment::allocate: {} rungs ({} vertices)",
            capacity_rungs, vertices
        );

        Self {
            positions: vec![0.0; vertices * 3],
            normals: vec![0.0; vertices * 3],
            uvs: vec![0.0; vertices * 2],
            capacity_rungs,
            vertex_count: 0,
            normal_count: 0,
            uv_count: 0,
            draw_range: DrawRange::default(),
            dirty: DirtyAttributes::default(),
            last_accepted: LastAccepted::NotYetSet,
            sealed: false,
            disposed: false,
        }
    }

    /// Set the active draw range to `[0, range_vertices)` and flag all
    /// attributes for upload
    pub fn commit(&mut self, range_vertices: usize) {
        debug_assert!(
            range_vertices <= self.capacity_vertices(),
            "draw range {} exceeds capacity {}",
            range_vertices,
            self.capacity_vertices()
        );
        self.draw_range = DrawRange {
            start: 0,
            count: range_vertices,
        };
        self.dirty = DirtyAttributes::ALL;
    }

    /// Release the owned arrays. Calling it again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(
            "StrokeSegment::dispose: releasing {} rungs of storage",
            self.capacity_rungs
        );
        self.positions = Vec::new();
        self.normals = Vec::new();
        self.uvs = Vec::new();
        self.draw_range = DrawRange::default();
        self.dirty = DirtyAttributes::default();
        self.sealed = true;
        self.disposed = true;
    }

    /// Stop accepting writes; the renderer keeps drawing what is there
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!("StrokeSegment::seal: {} rungs written", self.rung_count());
        }
        self.sealed = true;
    }

    // ========================================================================
    // Writes (synthesizer only)
    // ========================================================================

    /// Append one rung `a`, `b` at the position cursor and return its index
    ///
    /// Panics if the segment is full or sealed: rotating to a new segment is
    /// the caller's job and must happen before this point.
    pub(crate) fn push_rung(&mut self, a: glam::Vec3, b: glam::Vec3) -> usize {
        assert!(
            self.is_writable(),
            "add_point on a full or sealed segment ({} of {} rungs)",
            self.rung_count(),
            self.capacity_rungs
        );
        let rung = self.rung_count();
        let start = self.vertex_count;
        self.positions[start..start + 3].copy_from_slice(&a.to_array());
        self.positions[start + 3..start + 6].copy_from_slice(&b.to_array());
        self.vertex_count += FLOATS_PER_RUNG;
        rung
    }

    /// Write `normal` over the rung pair at the normal cursor and advance it
    /// by one rung
    ///
    /// Six copies are written; copies that would fall past the end of the
    /// array are dropped. They belong to a rung that does not exist yet and
    /// is overwritten by the next update anyway.
    pub(crate) fn write_smoothed_normal(&mut self, normal: glam::Vec3) {
        let n = normal.to_array();
        let start = self.normal_count;
        let end = (start + NORMAL_COPIES * 3).min(self.normals.len());
        for chunk in self.normals[start..end].chunks_exact_mut(3) {
            chunk.copy_from_slice(&n);
        }
        self.normal_count += FLOATS_PER_RUNG;
    }

    /// Mutable view of the whole UV array for the active policy
    pub(crate) fn uvs_mut(&mut self) -> &mut [f32] {
        &mut self.uvs
    }

    pub(crate) fn advance_uv_cursor(&mut self) {
        self.uv_count += UV_FLOATS_PER_RUNG;
    }

    pub(crate) fn set_last_accepted(&mut self, position: glam::Vec3) {
        self.last_accepted = LastAccepted::At(position);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Position floats written (always a multiple of 6)
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Normal cursor in floats
    pub fn normal_count(&self) -> usize {
        self.normal_count
    }

    /// UV floats written (always a multiple of 4)
    pub fn uv_count(&self) -> usize {
        self.uv_count
    }

    /// Number of rungs written
    pub fn rung_count(&self) -> usize {
        self.vertex_count / FLOATS_PER_RUNG
    }

    /// Number of vertices written
    pub fn vertices_written(&self) -> usize {
        self.vertex_count / 3
    }

    pub fn capacity_rungs(&self) -> usize {
        self.capacity_rungs
    }

    pub fn capacity_vertices(&self) -> usize {
        self.capacity_rungs * VERTICES_PER_RUNG
    }

    pub fn remaining_rungs(&self) -> usize {
        self.capacity_rungs - self.rung_count()
    }

    pub fn is_full(&self) -> bool {
        self.rung_count() >= self.capacity_rungs
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed || self.is_full()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether another rung can be written
    pub fn is_writable(&self) -> bool {
        !self.is_sealed()
    }

    pub fn last_accepted(&self) -> LastAccepted {
        self.last_accepted
    }

    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    pub fn dirty(&self) -> DirtyAttributes {
        self.dirty
    }

    /// Return the dirty flags and clear them; called by the renderer after
    /// it uploads the buffers
    pub fn take_dirty(&mut self) -> DirtyAttributes {
        std::mem::take(&mut self.dirty)
    }

    /// Full position array, including unwritten zeroed tail
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Full normal array, including unwritten zeroed tail
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Full UV array, including unwritten zeroed tail
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    /// Position of vertex `index`
    pub fn vertex(&self, index: usize) -> glam::Vec3 {
        glam::Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Normal of vertex `index`
    pub fn normal(&self, index: usize) -> glam::Vec3 {
        glam::Vec3::from_slice(&self.normals[index * 3..index * 3 + 3])
    }

    /// UV of vertex `index`
    pub fn uv(&self, index: usize) -> glam::Vec2 {
        glam::Vec2::from_slice(&self.uvs[index * 2..index * 2 + 2])
    }

    /// Positions inside the draw range as bytes, ready for upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions[..self.draw_range.end() * 3])
    }

    /// Normals inside the draw range as bytes, ready for upload
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals[..self.draw_range.end() * 3])
    }

    /// UVs inside the draw range as bytes, ready for upload
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs[..self.draw_range.end() * 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_allocate_zeroed() {
        let segment = StrokeSegment::allocate(4);
        assert_eq!(segment.positions().len(), 4 * 6);
        assert_eq!(segment.normals().len(), 4 * 6);
        assert_eq!(segment.uvs().len(), 4 * 4);
        assert!(segment.positions().iter().all(|&v| v == 0.0));
        assert_eq!(segment.vertex_count(), 0);
        assert_eq!(segment.uv_count(), 0);
        assert_eq!(segment.draw_range(), DrawRange::default());
        assert_eq!(segment.last_accepted(), LastAccepted::NotYetSet);
        assert!(!segment.dirty().any());
    }

    #[test]
    fn test_commit_marks_dirty() {
        let mut segment = StrokeSegment::allocate(4);
        segment.push_rung(Vec3::ZERO, Vec3::X);
        segment.commit(2);

        assert_eq!(segment.draw_range().end(), 2);
        assert_eq!(segment.dirty(), DirtyAttributes::ALL);

        let taken = segment.take_dirty();
        assert!(taken.any());
        assert!(!segment.dirty().any());
    }

    #[test]
    fn test_push_rung_layout() {
        let mut segment = StrokeSegment::allocate(2);
        let rung = segment.push_rung(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(rung, 0);
        assert_eq!(&segment.positions()[..6], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(segment.vertex(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(segment.remaining_rungs(), 1);
    }

    #[test]
    fn test_smoothed_normal_truncated_at_end() {
        let mut segment = StrokeSegment::allocate(2);
        segment.push_rung(Vec3::ZERO, Vec3::X);
        segment.push_rung(Vec3::Y, Vec3::ONE);
        segment.write_smoothed_normal(Vec3::Z);

        // 4 vertices exist; the two spill copies are dropped
        for i in 0..4 {
            assert_eq!(segment.normal(i), Vec3::Z);
        }
        assert_eq!(segment.normal_count(), 6);
    }

    #[test]
    #[should_panic(expected = "full or sealed")]
    fn test_push_past_capacity_panics() {
        let mut segment = StrokeSegment::allocate(1);
        segment.push_rung(Vec3::ZERO, Vec3::X);
        segment.push_rung(Vec3::Y, Vec3::ONE);
    }

    #[test]
    fn test_seal_blocks_writes() {
        let mut segment = StrokeSegment::allocate(4);
        assert!(segment.is_writable());
        segment.seal();
        assert!(segment.is_sealed());
        assert!(!segment.is_writable());
    }

    #[test]
    fn test_dispose_idempotent() {
        let mut segment = StrokeSegment::allocate(4);
        segment.push_rung(Vec3::ZERO, Vec3::X);
        segment.commit(2);

        segment.dispose();
        assert!(segment.is_disposed());
        assert!(segment.positions().is_empty());
        assert_eq!(segment.draw_range(), DrawRange::default());

        segment.dispose();
        assert!(segment.is_disposed());
        assert!(segment.position_bytes().is_empty());
    }

    #[test]
    fn test_byte_views_follow_draw_range() {
        let mut segment = StrokeSegment::allocate(4);
        segment.push_rung(Vec3::ZERO, Vec3::X);
        segment.commit(2);
        assert_eq!(segment.position_bytes().len(), 2 * 3 * 4);
        assert_eq!(segment.normal_bytes().len(), 2 * 3 * 4);
        assert_eq!(segment.uv_bytes().len(), 2 * 2 * 4);
    }
}
