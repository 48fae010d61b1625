//! Ribbon brush: the interface drawing tools talk to
//!
//! A brush is built once from a [`BrushConfig`] and then driven per frame:
//! the tool calls [`RibbonBrush::create_mesh`] when a stroke (or a new
//! segment of a long stroke) starts, feeds controller samples through
//! [`RibbonBrush::add_point`], and reads the segments back for rendering.

use glam::{Quat, Vec3};
use ribbon_config::BrushConfig;
use tracing::{debug, warn};

use crate::constants::ANIMATION_TIME_STEP;
use crate::material::BrushMaterial;
use crate::policy::ThicknessPolicy;
use crate::segment::StrokeSegment;
use crate::synth::RibbonSynthesizer;
use crate::types::{Hsv, Sample, SampleOutcome};
use crate::validation::{ConfigError, StrokeError, validate_config};

/// Opaque identifier of a mesh created by a brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// A segment together with the material copy it is drawn with
#[derive(Debug, Clone)]
pub struct StrokeMesh {
    pub handle: MeshHandle,
    pub segment: StrokeSegment,
    pub material: BrushMaterial,
}

/// Brush that turns controller samples into ribbon meshes
pub struct RibbonBrush {
    /// Options the brush was built from
    config: BrushConfig,
    /// Rung/normal/UV synthesis
    synth: RibbonSynthesizer,
    /// Template copied into every new mesh
    material: BrushMaterial,
    /// Meshes created by this brush, oldest first
    meshes: Vec<StrokeMesh>,
    /// Mesh receiving new samples
    active: Option<MeshHandle>,
    next_id: u32,
}

impl RibbonBrush {
    /// Build a brush, picking the thickness/UV policy from `enable_pressure`
    pub fn new(config: BrushConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;

        let policy = ThicknessPolicy::from_pressure_flag(config.enable_pressure);
        let synth = RibbonSynthesizer::new(
            config.delta,
            config.half_thickness(),
            config.max_spread as usize,
            policy,
        );
        let material = BrushMaterial::from_config(&config);

        debug!(
            "RibbonBrush::new: material={}, pressure={}, delta={}, capacity={} rungs",
            config.material_id, config.enable_pressure, config.delta, config.capacity_rungs
        );

        Ok(Self {
            config,
            synth,
            material,
            meshes: Vec::new(),
            active: None,
            next_id: 0,
        })
    }

    /// Build a brush with the default configuration
    pub fn with_default_config() -> Result<Self, ConfigError> {
        Self::new(BrushConfig::default())
    }

    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    pub fn policy(&self) -> &ThicknessPolicy {
        self.synth.policy()
    }

    /// Start a new mesh and make it the target of `add_point`
    ///
    /// The previously active mesh is sealed and stays available for
    /// rendering until it is disposed.
    pub fn create_mesh(&mut self) -> MeshHandle {
        if let Some(mesh) = self.active.take().and_then(|previous| self.find_mut(previous)) {
            mesh.segment.seal();
        }

        let handle = MeshHandle(self.next_id);
        self.next_id += 1;

        self.meshes.push(StrokeMesh {
            handle,
            segment: StrokeSegment::allocate(self.config.capacity_rungs),
            material: self.material.clone(),
        });
        self.active = Some(handle);

        debug!(
            "RibbonBrush::create_mesh: {:?} ({} meshes live)",
            handle,
            self.meshes.len()
        );
        handle
    }

    /// Feed one controller sample into the active mesh
    ///
    /// Returns `Ok(Rejected)` for samples closer than `delta` to the last
    /// accepted one. Panics if the active mesh is already full; check
    /// [`RibbonBrush::needs_new_mesh`] and call `create_mesh` first.
    pub fn add_point(
        &mut self,
        position: Vec3,
        orientation: Quat,
        pressure: f32,
    ) -> Result<SampleOutcome, StrokeError> {
        self.add_sample(Sample::new(position, orientation, pressure))
    }

    /// Same as [`RibbonBrush::add_point`] with a prebuilt sample
    pub fn add_sample(&mut self, sample: Sample) -> Result<SampleOutcome, StrokeError> {
        let Some(handle) = self.active else {
            warn!("RibbonBrush::add_point: no active mesh, ignoring sample");
            return Err(StrokeError::NoActiveMesh);
        };
        let Some(index) = self.index_of(handle) else {
            return Err(StrokeError::NoActiveMesh);
        };

        let segment = &mut self.meshes[index].segment;
        Ok(self.synth.add_point(segment, sample))
    }

    /// Whether the next sample needs a fresh mesh (none active, or full)
    pub fn needs_new_mesh(&self) -> bool {
        self.active_segment()
            .is_none_or(|segment| !segment.is_writable())
    }

    /// Set the full brush width; the ribbon offset is half of it
    pub fn set_thickness(&mut self, thickness: f32) {
        debug_assert!(thickness.is_finite(), "non-finite thickness {thickness}");
        self.synth.set_half_thickness(thickness / 2.0);
    }

    /// Current ribbon offset (half the brush width)
    pub fn thickness(&self) -> f32 {
        self.synth.half_thickness()
    }

    /// Set the brush color from a picker value
    ///
    /// Materials without a color input ignore this. Meshes already created
    /// keep their own material copy.
    pub fn set_color(&mut self, hsv: Hsv) {
        if !self.material.set_hsv(hsv) {
            debug!(
                "RibbonBrush::set_color: material {} has no color, ignoring",
                self.material.id()
            );
        }
    }

    /// Brush material template
    pub fn material(&self) -> &BrushMaterial {
        &self.material
    }

    /// Per-frame tick: advance the clock of every animated mesh material
    pub fn update(&mut self) {
        for mesh in &mut self.meshes {
            mesh.material.advance(ANIMATION_TIME_STEP);
        }
    }

    // ========================================================================
    // Mesh access
    // ========================================================================

    pub fn active_mesh(&self) -> Option<MeshHandle> {
        self.active
    }

    pub fn active_segment(&self) -> Option<&StrokeSegment> {
        self.active.and_then(|handle| self.segment(handle))
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&StrokeMesh> {
        self.meshes.iter().find(|mesh| mesh.handle == handle)
    }

    pub fn segment(&self, handle: MeshHandle) -> Option<&StrokeSegment> {
        self.mesh(handle).map(|mesh| &mesh.segment)
    }

    /// Mutable segment access, for the renderer's `take_dirty`
    pub fn segment_mut(&mut self, handle: MeshHandle) -> Option<&mut StrokeSegment> {
        self.find_mut(handle).map(|mesh| &mut mesh.segment)
    }

    pub fn mesh_material(&self, handle: MeshHandle) -> Option<&BrushMaterial> {
        self.mesh(handle).map(|mesh| &mesh.material)
    }

    /// All live meshes, oldest first
    pub fn meshes(&self) -> impl Iterator<Item = &StrokeMesh> {
        self.meshes.iter()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Release a mesh's storage and forget it
    pub fn dispose_mesh(&mut self, handle: MeshHandle) -> Result<(), StrokeError> {
        let index = self
            .index_of(handle)
            .ok_or(StrokeError::UnknownMesh(handle))?;

        let mut mesh = self.meshes.remove(index);
        mesh.segment.dispose();

        if self.active == Some(handle) {
            self.active = None;
        }
        debug!("RibbonBrush::dispose_mesh: {:?}", handle);
        Ok(())
    }

    /// Release every mesh this brush created
    pub fn dispose(&mut self) {
        for mesh in &mut self.meshes {
            mesh.segment.dispose();
        }
        self.meshes.clear();
        self.active = None;
    }

    fn index_of(&self, handle: MeshHandle) -> Option<usize> {
        self.meshes.iter().position(|mesh| mesh.handle == handle)
    }

    fn find_mut(&mut self, handle: MeshHandle) -> Option<&mut StrokeMesh> {
        self.meshes.iter_mut().find(|mesh| mesh.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brush(config: BrushConfig) -> RibbonBrush {
        RibbonBrush::new(config).unwrap()
    }

    fn step(k: usize) -> Vec3 {
        Vec3::new(0.0, k as f32, 0.0)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = RibbonBrush::new(BrushConfig::default().with_capacity(0));
        assert!(matches!(result, Err(ConfigError::ZeroCapacity)));
    }

    #[test]
    fn test_policy_from_config() {
        assert!(brush(BrushConfig::pressure_ribbon()).policy().is_pressure_driven());
        assert!(!brush(BrushConfig::textured_ribbon()).policy().is_pressure_driven());
    }

    #[test]
    fn test_add_point_without_mesh() {
        let mut brush = brush(BrushConfig::default());
        assert_eq!(
            brush.add_point(Vec3::ZERO, Quat::IDENTITY, 1.0),
            Err(StrokeError::NoActiveMesh)
        );
        assert!(brush.needs_new_mesh());
    }

    #[test]
    fn test_stroke_into_mesh() {
        let mut brush = brush(BrushConfig::default().with_delta(0.1));
        let handle = brush.create_mesh();

        for k in 0..5 {
            let outcome = brush.add_point(step(k), Quat::IDENTITY, 0.5).unwrap();
            assert_eq!(outcome, SampleOutcome::Accepted { rung: k });
        }
        let outcome = brush.add_point(Vec3::new(0.0, 4.01, 0.0), Quat::IDENTITY, 0.5);
        assert_eq!(outcome, Ok(SampleOutcome::Rejected));

        let segment = brush.segment(handle).unwrap();
        assert_eq!(segment.vertex_count(), 30);
        assert_eq!(segment.draw_range().end(), 10);
    }

    #[test]
    fn test_create_mesh_resets_spacing_and_seals_previous() {
        let mut brush = brush(BrushConfig::default().with_delta(0.1));
        let first = brush.create_mesh();
        brush.add_point(Vec3::ZERO, Quat::IDENTITY, 1.0).unwrap();

        let second = brush.create_mesh();
        assert_ne!(first, second);
        assert!(brush.segment(first).unwrap().is_sealed());

        // Same position as the last sample of the previous segment
        let outcome = brush.add_point(Vec3::ZERO, Quat::IDENTITY, 1.0).unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(brush.mesh_count(), 2);
    }

    #[test]
    fn test_segment_rotation_at_capacity() {
        let mut brush = brush(BrushConfig::default().with_delta(0.1).with_capacity(3));
        brush.create_mesh();

        let mut accepted = 0;
        for k in 0..7 {
            if brush.needs_new_mesh() {
                brush.create_mesh();
            }
            if brush.add_point(step(k), Quat::IDENTITY, 1.0).unwrap().is_accepted() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 7);
        assert_eq!(brush.mesh_count(), 3);
        let rungs: Vec<usize> = brush.meshes().map(|m| m.segment.rung_count()).collect();
        assert_eq!(rungs, vec![3, 3, 1]);
    }

    #[test]
    #[should_panic(expected = "full or sealed")]
    fn test_add_point_on_full_mesh_panics() {
        let mut brush = brush(BrushConfig::default().with_delta(0.1).with_capacity(3));
        brush.create_mesh();
        for k in 0..4 {
            let _ = brush.add_point(step(k), Quat::IDENTITY, 1.0);
        }
    }

    #[test]
    fn test_set_thickness_halves() {
        let mut brush = brush(BrushConfig::textured_ribbon().with_delta(0.1));
        assert!((brush.thickness() - 0.25).abs() < 1e-6);

        brush.set_thickness(2.0);
        assert_eq!(brush.thickness(), 1.0);

        let handle = brush.create_mesh();
        brush.add_point(Vec3::ZERO, Quat::IDENTITY, 0.0).unwrap();
        let segment = brush.segment(handle).unwrap();
        assert!((segment.vertex(0).distance(segment.vertex(1)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_color_applies_to_new_meshes() {
        let mut brush = brush(BrushConfig::default());
        let before = brush.create_mesh();

        brush.set_color(Hsv::new(0.0, 1.0, 1.0));
        let after = brush.create_mesh();

        let white = Some([1.0, 1.0, 1.0, 1.0]);
        assert_eq!(brush.material().color(), white);
        assert_eq!(brush.mesh_material(after).unwrap().color(), white);
        assert_ne!(brush.mesh_material(before).unwrap().color(), white);
    }

    #[test]
    fn test_set_color_ignored_without_color() {
        let mut brush = brush(BrushConfig::animated_ribbon());
        brush.set_color(Hsv::new(0.5, 1.0, 1.0));
        assert_eq!(brush.material().color(), None);
    }

    #[test]
    fn test_update_advances_animated_meshes() {
        let mut brush = brush(BrushConfig::animated_ribbon());
        let a = brush.create_mesh();
        let b = brush.create_mesh();

        for _ in 0..10 {
            brush.update();
        }

        for handle in [a, b] {
            let time = brush.mesh_material(handle).unwrap().time();
            assert!((time - 0.1).abs() < 1e-5);
        }
        // The template itself does not tick
        assert_eq!(brush.material().time(), 0.0);
    }

    #[test]
    fn test_update_leaves_static_meshes() {
        let mut brush = brush(BrushConfig::default());
        let handle = brush.create_mesh();
        brush.update();
        assert_eq!(brush.mesh_material(handle).unwrap().time(), 0.0);
    }

    #[test]
    fn test_dispose_mesh() {
        let mut brush = brush(BrushConfig::default());
        let first = brush.create_mesh();
        let second = brush.create_mesh();

        brush.dispose_mesh(first).unwrap();
        assert!(brush.segment(first).is_none());
        assert_eq!(brush.active_mesh(), Some(second));
        assert_eq!(
            brush.dispose_mesh(first),
            Err(StrokeError::UnknownMesh(first))
        );

        brush.dispose_mesh(second).unwrap();
        assert_eq!(brush.active_mesh(), None);
        assert_eq!(
            brush.add_point(Vec3::ZERO, Quat::IDENTITY, 1.0),
            Err(StrokeError::NoActiveMesh)
        );
    }

    #[test]
    fn test_dispose_all() {
        let mut brush = brush(BrushConfig::default());
        brush.create_mesh();
        brush.create_mesh();
        brush.dispose();
        assert_eq!(brush.mesh_count(), 0);
        assert!(brush.needs_new_mesh());
        brush.dispose();
    }

    #[test]
    fn test_renderer_dirty_handshake() {
        let mut brush = brush(BrushConfig::default().with_delta(0.1));
        let handle = brush.create_mesh();
        brush.add_point(Vec3::ZERO, Quat::IDENTITY, 1.0).unwrap();

        let segment = brush.segment_mut(handle).unwrap();
        assert!(segment.take_dirty().any());
        assert!(!segment.dirty().any());

        brush.add_point(Vec3::ZERO, Quat::IDENTITY, 1.0).unwrap();
        assert!(!brush.segment(handle).unwrap().dirty().any());
    }
}
