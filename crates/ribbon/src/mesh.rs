//! Bevy mesh conversion for ribbon segments

use bevy::asset::RenderAssetUsages;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;

use crate::segment::StrokeSegment;

impl StrokeSegment {
    /// Copy the draw range into a triangle-strip Bevy mesh
    pub fn to_bevy_mesh(&self) -> Mesh {
        let vertices = self.draw_range().end();

        let positions: Vec<[f32; 3]> = (0..vertices).map(|i| self.vertex(i).to_array()).collect();
        let normals: Vec<[f32; 3]> = (0..vertices).map(|i| self.normal(i).to_array()).collect();
        let uvs: Vec<[f32; 2]> = (0..vertices).map(|i| self.uv(i).to_array()).collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleStrip,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh
    }
}
