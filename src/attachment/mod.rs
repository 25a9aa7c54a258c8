//! Attachments
//!
//! Shapes bound to slots. The set of kinds is closed, so attachments are a
//! sum type and consumers match exhaustively:
//! - [`RegionAttachment`]: a textured quad
//! - [`MeshAttachment`]: a skinned, triangulated textured surface
//! - [`ClippingAttachment`]: a mask polygon, never drawn
//! - [`BoundingBoxAttachment`] / [`PointAttachment`]: gameplay helpers, never drawn

pub mod mesh;
pub mod region;
pub mod vertices;

use glam::Vec2;

pub use mesh::MeshAttachment;
pub use region::{QUAD_TRIANGLES, RegionAttachment};
pub use vertices::{BoneWeight, VertexData, VertexWeights};

use crate::pose::{Bone, Slot};

/// Polygon mask applied to subsequently drawn slots until `end_slot`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClippingAttachment {
    pub name: String,
    pub vertices: VertexData,
    /// Slot index that closes the mask. `None` keeps it active until the
    /// end of the frame.
    pub end_slot: Option<usize>,
}

impl ClippingAttachment {
    #[must_use]
    pub fn new(name: &str, vertices: VertexData, end_slot: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            end_slot,
        }
    }

    /// World-space polygon (`x, y` per vertex).
    #[must_use]
    pub fn world_polygon(&self, bones: &[Bone], slot: &Slot) -> Vec<f32> {
        let mut out = vec![0.0; self.vertices.world_vertices_length()];
        self.vertices.compute_world_vertices(bones, slot, &mut out);
        out
    }
}

/// Hit-test polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundingBoxAttachment {
    pub name: String,
    pub vertices: VertexData,
}

/// A single oriented point in bone space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointAttachment {
    pub name: String,
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Region(RegionAttachment),
    Mesh(MeshAttachment),
    Clipping(ClippingAttachment),
    BoundingBox(BoundingBoxAttachment),
    Point(PointAttachment),
}

impl Attachment {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Region(a) => &a.name,
            Self::Mesh(a) => &a.name,
            Self::Clipping(a) => &a.name,
            Self::BoundingBox(a) => &a.name,
            Self::Point(a) => &a.name,
        }
    }
}

impl From<RegionAttachment> for Attachment {
    fn from(value: RegionAttachment) -> Self {
        Self::Region(value)
    }
}

impl From<MeshAttachment> for Attachment {
    fn from(value: MeshAttachment) -> Self {
        Self::Mesh(value)
    }
}

impl From<ClippingAttachment> for Attachment {
    fn from(value: ClippingAttachment) -> Self {
        Self::Clipping(value)
    }
}

impl From<BoundingBoxAttachment> for Attachment {
    fn from(value: BoundingBoxAttachment) -> Self {
        Self::BoundingBox(value)
    }
}

impl From<PointAttachment> for Attachment {
    fn from(value: PointAttachment) -> Self {
        Self::Point(value)
    }
}
