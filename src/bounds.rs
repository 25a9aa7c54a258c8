//! Bounding Box Calculator
//!
//! On-demand axis-aligned bounds of the renderable attachments, used by the
//! host for content-size reporting. Independent of the builder: slots are
//! visited in setup order, masks are ignored.

use glam::Vec2;

use crate::attachment::Attachment;
use crate::builder::VertexScratch;
use crate::pose::Skeleton;

/// Axis-aligned rectangle in the node's parent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle spanning `min..max`.
    #[must_use]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }

    /// `true` when nothing contributed to the bounds (or the size is
    /// otherwise negative or NaN).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.size.x >= 0.0 && self.size.y >= 0.0)
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        !self.is_empty() && point.cmpge(self.min()).all() && point.cmple(self.max()).all()
    }
}

/// Computes the bounds of every Region and Mesh attachment, with world
/// vertices scaled by `scale` and the result offset by `position`.
///
/// When no slot contributes a vertex the accumulators keep their
/// `(+∞, +∞, −∞, −∞)` seeds and the returned rectangle is empty.
#[must_use]
pub fn compute_bounds(skeleton: &Skeleton, scale: Vec2, position: Vec2) -> Rect {
    let mut scratch = VertexScratch::default();
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);

    for slot in skeleton.slots() {
        let Some(attachment) = slot.attachment() else {
            continue;
        };

        let vertices: &[f32] = match attachment.as_ref() {
            Attachment::Region(region) => {
                let Some(bone) = skeleton.bones().get(slot.bone_index()) else {
                    continue;
                };
                let out = scratch.ensure(8);
                region.compute_world_vertices(bone, out, 0, 2);
                out
            }
            Attachment::Mesh(mesh) => {
                let out = scratch.ensure(mesh.world_vertices_length());
                mesh.compute_world_vertices(skeleton.bones(), slot, out);
                out
            }
            Attachment::Clipping(_) | Attachment::BoundingBox(_) | Attachment::Point(_) => continue,
        };

        for p in vertices.chunks_exact(2) {
            let scaled = Vec2::new(p[0], p[1]) * scale;
            min = min.min(scaled);
            max = max.max(scaled);
        }
    }

    Rect::new(position + min, max - min)
}
