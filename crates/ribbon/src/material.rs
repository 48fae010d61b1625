//! Shading state attached to ribbon meshes

use ribbon_config::BrushConfig;

use crate::types::Hsv;

/// Material parameters the renderer binds for a ribbon mesh
///
/// The brush keeps a template and every mesh it creates gets its own copy,
/// so changing the brush color affects meshes created afterwards only.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushMaterial {
    /// Renderer-side material identifier
    id: String,
    /// RGBA color, `None` for materials without a color input
    color: Option<[f32; 4]>,
    /// Whether `advance` moves the animation clock
    animated: bool,
    /// Animation clock fed to the shader
    time: f32,
}

impl BrushMaterial {
    pub fn new(id: impl Into<String>, color: Option<[f32; 4]>, animated: bool) -> Self {
        Self {
            id: id.into(),
            color,
            animated,
            time: 0.0,
        }
    }

    /// Build the template material described by a brush config
    pub fn from_config(config: &BrushConfig) -> Self {
        let color = config.material_has_color.then(|| config.color_rgba());
        Self::new(config.material_id.clone(), color, config.animated)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn color(&self) -> Option<[f32; 4]> {
        self.color
    }

    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    /// Set the color if this material has one. Returns whether it did.
    pub fn set_color(&mut self, rgba: [f32; 4]) -> bool {
        match self.color.as_mut() {
            Some(color) => {
                *color = rgba;
                true
            }
            None => false,
        }
    }

    /// Set the color from a picker value if this material has one
    ///
    /// The picker's third component is read as HSL lightness.
    pub fn set_hsv(&mut self, hsv: Hsv) -> bool {
        self.set_color(hsv.to_hsl_rgba())
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Move the animation clock forward; static materials ignore this
    pub fn advance(&mut self, step: f32) {
        if self.animated {
            self.time += step;
        }
    }
}
