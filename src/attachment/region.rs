use glam::{Affine2, Vec2};

use crate::color::Color;
use crate::pose::Bone;
use crate::texture::TextureRegion;

// Corner order of the 8-float offset and UV templates.
pub const BLX: usize = 0;
pub const BLY: usize = 1;
pub const ULX: usize = 2;
pub const ULY: usize = 3;
pub const URX: usize = 4;
pub const URY: usize = 5;
pub const BRX: usize = 6;
pub const BRY: usize = 7;

/// Two triangles over the BL, UL, UR, BR corners.
pub const QUAD_TRIANGLES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A single textured quad attached to a bone.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAttachment {
    pub name: String,
    pub texture: Option<TextureRegion>,
    pub color: Color,

    // === Placement in bone space ===
    pub x: f32,
    pub y: f32,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub width: f32,
    pub height: f32,

    offset: [f32; 8],
    uvs: [f32; 8],
}

impl RegionAttachment {
    /// Creates a `width` × `height` quad centered on the bone origin.
    #[must_use]
    pub fn new(name: &str, width: f32, height: f32) -> Self {
        let mut region = Self {
            name: name.to_string(),
            texture: None,
            color: Color::WHITE,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            width,
            height,
            offset: [0.0; 8],
            uvs: [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
        };
        region.update_offset();
        region
    }

    /// Binds a texture region and derives the corner UVs from it.
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

    /// Sets the placement and recomputes the offset template.
    #[must_use]
    pub fn with_transform(mut self, x: f32, y: f32, rotation: f32, scale_x: f32, scale_y: f32) -> Self {
        self.x = x;
        self.y = y;
        self.rotation = rotation;
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self.update_offset();
        self
    }

    pub fn set_region(&mut self, region: TextureRegion) {
        let corners = [(0.0, 1.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        for (i, (s, t)) in corners.into_iter().enumerate() {
            let [u, v] = region.map_uv(s, t);
            self.uvs[i * 2] = u;
            self.uvs[i * 2 + 1] = v;
        }
        self.texture = Some(region);
    }

    /// Recomputes the bone-space corners from size, position, rotation and
    /// scale. Call after changing any placement field directly.
    pub fn update_offset(&mut self) {
        let half = Vec2::new(self.width * 0.5, self.height * 0.5);
        let local = Affine2::from_scale_angle_translation(
            Vec2::new(self.scale_x, self.scale_y),
            self.rotation.to_radians(),
            Vec2::new(self.x, self.y),
        );
        let corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(-half.x, half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(half.x, -half.y),
        ];
        for (i, corner) in corners.into_iter().enumerate() {
            let p = local.transform_point2(corner);
            self.offset[i * 2] = p.x;
            self.offset[i * 2 + 1] = p.y;
        }
    }

    /// Bone-space corners in BL, UL, UR, BR order.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> &[f32; 8] {
        &self.offset
    }

    /// Corner UVs in BL, UL, UR, BR order.
    #[inline]
    #[must_use]
    pub fn uvs(&self) -> &[f32; 8] {
        &self.uvs
    }

    /// Writes the 4 world-space corners to `out`, starting at `offset` and
    /// advancing `stride` floats per vertex.
    pub fn compute_world_vertices(&self, bone: &Bone, out: &mut [f32], offset: usize, stride: usize) {
        for (i, corner) in self.offset.chunks_exact(2).enumerate() {
            let world = bone.local_to_world(Vec2::new(corner[0], corner[1]));
            let o = offset + i * stride;
            out[o] = world.x;
            out[o + 1] = world.y;
        }
    }
}
