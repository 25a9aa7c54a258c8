use crate::attachment::VertexData;
use crate::color::Color;
use crate::errors::{Result, SkeletonError};
use crate::pose::{Bone, Slot};
use crate::texture::TextureRegion;

/// An arbitrary triangulated, textured surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAttachment {
    pub name: String,
    pub texture: Option<TextureRegion>,
    pub color: Color,
    vertices: VertexData,
    /// Region-relative UVs (`0..=1`), as authored.
    region_uvs: Vec<f32>,
    /// Page UVs derived from `region_uvs` and the bound texture region.
    uvs: Vec<f32>,
    triangles: Vec<u32>,
}

impl MeshAttachment {
    /// Validates and creates a mesh.
    ///
    /// `region_uvs` holds one `u, v` pair per vertex, `triangles` holds
    /// index triples into the vertex list. An empty triangle list is valid
    /// and simply renders nothing.
    pub fn new(name: &str, vertices: VertexData, region_uvs: Vec<f32>, triangles: Vec<u32>) -> Result<Self> {
        let vertex_count = vertices.vertex_count();
        let invalid = |reason: String| SkeletonError::InvalidMesh {
            name: name.to_string(),
            reason,
        };

        if region_uvs.len() != vertex_count * 2 {
            return Err(invalid(format!(
                "{} uv floats for {vertex_count} vertices",
                region_uvs.len()
            )));
        }
        if triangles.len() % 3 != 0 {
            return Err(invalid(format!(
                "triangle index count {} is not a multiple of 3",
                triangles.len()
            )));
        }
        if let Some(&index) = triangles.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(invalid(format!(
                "triangle index {index} out of range for {vertex_count} vertices"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            texture: None,
            color: Color::WHITE,
            vertices,
            uvs: region_uvs.clone(),
            region_uvs,
            triangles,
        })
    }

    #[must_use]
    pub fn with_region(mut self, region: TextureRegion) -> Self {
        self.set_region(region);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Binds a texture region and maps the authored UVs into page space.
    pub fn set_region(&mut self, region: TextureRegion) {
        for (dst, src) in self.uvs.chunks_exact_mut(2).zip(self.region_uvs.chunks_exact(2)) {
            let [u, v] = region.map_uv(src[0], src[1]);
            dst[0] = u;
            dst[1] = v;
        }
        self.texture = Some(region);
    }

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &VertexData {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    #[inline]
    #[must_use]
    pub fn world_vertices_length(&self) -> usize {
        self.vertices.world_vertices_length()
    }

    /// Skins the mesh into `out` (`x, y` per vertex).
    pub fn compute_world_vertices(&self, bones: &[Bone], slot: &Slot, out: &mut [f32]) {
        self.vertices.compute_world_vertices(bones, slot, out);
    }
}
