//! Clipping mask engine
//!
//! A [`ClippingAttachment`] masks every slot drawn after it until its end
//! slot is reached. The builder drives the engine through the [`Clipper`]
//! trait:
//!
//! ```text
//!            clip_start(slot, mask)
//!   Idle ─────────────────────────────▶ Clipping { end_slot, polygons }
//!    ▲                                      │
//!    └──── clip_end_slot(end_slot) ─────────┤
//!    └──── clip_end() ──────────────────────┘
//! ```
//!
//! `Idle` is the state at both the start and the end of every build.
//! Masks do not nest: `clip_start` while already clipping is ignored.

pub mod polygon;

use glam::Vec2;

use crate::attachment::ClippingAttachment;
use crate::pose::Skeleton;

/// Capability consumed by the geometry builder.
pub trait Clipper {
    /// Activates the mask defined by `clip` on slot `slot_index`.
    fn clip_start(&mut self, skeleton: &Skeleton, slot_index: usize, clip: &ClippingAttachment);

    fn is_clipping(&self) -> bool;

    /// Clips an indexed triangle list (`x, y` vertices, `u, v` UVs) against
    /// the active mask. Results are read back through the `clipped_*`
    /// accessors and stay valid until the next call.
    fn clip_triangles(&mut self, vertices: &[f32], triangles: &[u32], uvs: &[f32]);

    fn clipped_vertices(&self) -> &[f32];
    fn clipped_triangles(&self) -> &[u32];
    fn clipped_uvs(&self) -> &[f32];

    /// Ends the active mask if `slot_index` is its end slot. A no-op in every
    /// other case, including when no mask is active.
    fn clip_end_slot(&mut self, slot_index: usize);

    /// Unconditionally returns to the idle state.
    fn clip_end(&mut self);
}

/// State of the default mask engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClipState {
    #[default]
    Idle,
    Clipping {
        start_slot: usize,
        end_slot: Option<usize>,
        /// Convex, counter-clockwise pieces whose union is the mask.
        polygons: Vec<Vec<Vec2>>,
    },
}

/// Default [`Clipper`]: decomposes the mask into convex pieces and clips
/// each triangle against each piece (Sutherland–Hodgman), interpolating UVs
/// with the barycentric weights of the source triangle.
#[derive(Debug, Default)]
pub struct SkeletonClipper {
    state: ClipState,

    clipped_vertices: Vec<f32>,
    clipped_triangles: Vec<u32>,
    clipped_uvs: Vec<f32>,

    clip_output: Vec<Vec2>,
    clip_scratch: Vec<Vec2>,
}

impl SkeletonClipper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ClipState {
        &self.state
    }

    /// Convex pieces of the active mask, empty when idle.
    #[must_use]
    pub fn mask_polygons(&self) -> &[Vec<Vec2>] {
        match &self.state {
            ClipState::Idle => &[],
            ClipState::Clipping { polygons, .. } => polygons,
        }
    }

    fn clear_output(&mut self) {
        self.clipped_vertices.clear();
        self.clipped_triangles.clear();
        self.clipped_uvs.clear();
    }
}

impl Clipper for SkeletonClipper {
    fn clip_start(&mut self, skeleton: &Skeleton, slot_index: usize, clip: &ClippingAttachment) {
        if self.is_clipping() {
            log::trace!("Ignoring nested clip '{}' on slot {slot_index}", clip.name);
            return;
        }
        let Some(slot) = skeleton.slots().get(slot_index) else {
            return;
        };

        let world = clip.world_polygon(skeleton.bones(), slot);
        let mut mask: Vec<Vec2> = world.chunks_exact(2).map(|p| Vec2::new(p[0], p[1])).collect();
        polygon::dedup_closed(&mut mask);
        if mask.len() < 3 {
            return;
        }
        polygon::make_counter_clockwise(&mut mask);

        // A zero-area mask stays active and hides everything.
        let polygons = if polygon::is_degenerate(&mask) {
            Vec::new()
        } else if polygon::is_convex(&mask) {
            vec![mask]
        } else {
            polygon::triangulate(&mask)
                .into_iter()
                .map(|t| t.to_vec())
                .collect()
        };

        self.state = ClipState::Clipping {
            start_slot: slot_index,
            end_slot: clip.end_slot,
            polygons,
        };
    }

    #[inline]
    fn is_clipping(&self) -> bool {
        matches!(self.state, ClipState::Clipping { .. })
    }

    fn clip_triangles(&mut self, vertices: &[f32], triangles: &[u32], uvs: &[f32]) {
        self.clear_output();

        let ClipState::Clipping { polygons, .. } = &self.state else {
            self.clipped_vertices.extend_from_slice(vertices);
            self.clipped_triangles.extend_from_slice(triangles);
            self.clipped_uvs.extend_from_slice(uvs);
            return;
        };

        let position = |i: u32| {
            let i = i as usize * 2;
            vertices
                .get(i..i + 2)
                .map(|p| Vec2::new(p[0], p[1]))
        };
        let uv = |i: u32| {
            let i = i as usize * 2;
            uvs.get(i..i + 2).map(|p| Vec2::new(p[0], p[1]))
        };

        for triangle in triangles.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (position(triangle[0]), position(triangle[1]), position(triangle[2]))
            else {
                continue;
            };
            let (Some(uv_a), Some(uv_b), Some(uv_c)) = (uv(triangle[0]), uv(triangle[1]), uv(triangle[2])) else {
                continue;
            };

            if polygon::is_degenerate(&[a, b, c]) {
                continue;
            }
            let ab = b - a;
            let ac = c - a;
            let inv_det = ab.perp_dot(ac).recip();

            for piece in polygons {
                polygon::clip_convex(&[a, b, c], piece, &mut self.clip_output, &mut self.clip_scratch);
                polygon::dedup_closed(&mut self.clip_output);
                if self.clip_output.len() < 3 {
                    continue;
                }

                let base = (self.clipped_vertices.len() / 2) as u32;
                for &p in &self.clip_output {
                    let ap = p - a;
                    let wb = ap.perp_dot(ac) * inv_det;
                    let wc = ab.perp_dot(ap) * inv_det;
                    let wa = 1.0 - wb - wc;
                    let interpolated = uv_a * wa + uv_b * wb + uv_c * wc;

                    self.clipped_vertices.extend_from_slice(&[p.x, p.y]);
                    self.clipped_uvs.extend_from_slice(&[interpolated.x, interpolated.y]);
                }
                let count = self.clip_output.len() as u32;
                for k in 1..count - 1 {
                    self.clipped_triangles.extend_from_slice(&[base, base + k, base + k + 1]);
                }
            }
        }
    }

    #[inline]
    fn clipped_vertices(&self) -> &[f32] {
        &self.clipped_vertices
    }

    #[inline]
    fn clipped_triangles(&self) -> &[u32] {
        &self.clipped_triangles
    }

    #[inline]
    fn clipped_uvs(&self) -> &[f32] {
        &self.clipped_uvs
    }

    fn clip_end_slot(&mut self, slot_index: usize) {
        if let ClipState::Clipping {
            end_slot: Some(end), ..
        } = self.state
            && end == slot_index
        {
            self.clip_end();
        }
    }

    fn clip_end(&mut self) {
        self.state = ClipState::Idle;
        self.clear_output();
    }
}
