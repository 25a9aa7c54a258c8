//! Frame Geometry Builder
//!
//! Walks a posed [`Skeleton`] in draw order and rebuilds the geometry sink
//! from scratch every frame. There is no diffing: any pose change is picked
//! up by the next full rebuild.
//!
//! Per slot:
//! 1. Region → 4 world corners and the fixed quad indices.
//! 2. Mesh → skinned world vertices, authored triangles and UVs.
//! 3. Clipping → activates the mask, emits nothing.
//! 4. Blend state and tint color from slot, skeleton and settings.
//! 5. Mask applied when active; empty results are dropped.
//! 6. One [`GeometryInstance`](crate::geometry::GeometryInstance) per
//!    surviving attachment, in draw order.
//!
//! The clipper is always idle when `build` returns, on success or error.

use crate::attachment::{Attachment, QUAD_TRIANGLES};
use crate::clipping::{Clipper, SkeletonClipper};
use crate::color::tint_color;
use crate::errors::{Result, SkeletonError};
use crate::geometry::{BlendMode, GeometrySink, SkeletonVertex};
use crate::pose::Skeleton;
use crate::settings::RenderSettings;
use crate::texture::{TextureKey, TextureRegion};

/// Growable world-vertex storage reused across slots and frames.
///
/// The backing buffer only grows. Its logical length is chosen per use by
/// the caller, so stale floats past that length are never read.
#[derive(Debug, Clone, Default)]
pub struct VertexScratch {
    data: Vec<f32>,
}

impl VertexScratch {
    #[must_use]
    pub fn with_capacity(floats: usize) -> Self {
        Self {
            data: vec![0.0; floats],
        }
    }

    /// Floats available without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns at least `floats` writable floats, growing when needed.
    pub fn ensure(&mut self, floats: usize) -> &mut [f32] {
        if floats > self.data.len() {
            log::debug!("Vertex scratch expanding capacity: {} -> {}", self.data.len(), floats);
            self.data.resize(floats, 0.0);
        }
        &mut self.data[..floats]
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Per-frame geometry synthesis for one skeleton.
///
/// Owns the vertex scratch and the mask engine so neither is reallocated
/// per slot or per frame.
#[derive(Debug)]
pub struct SkeletonGeometryBuilder<C: Clipper = SkeletonClipper> {
    settings: RenderSettings,
    scratch: VertexScratch,
    clipper: C,
}

impl SkeletonGeometryBuilder<SkeletonClipper> {
    #[must_use]
    pub fn new(settings: RenderSettings) -> Self {
        Self::with_clipper(settings, SkeletonClipper::new())
    }
}

impl Default for SkeletonGeometryBuilder<SkeletonClipper> {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl<C: Clipper> SkeletonGeometryBuilder<C> {
    #[must_use]
    pub fn with_clipper(settings: RenderSettings, clipper: C) -> Self {
        Self {
            scratch: VertexScratch::with_capacity(settings.initial_scratch_floats),
            settings,
            clipper,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn premultiplied_alpha(&self) -> bool {
        self.settings.premultiplied_alpha
    }

    pub fn set_premultiplied_alpha(&mut self, premultiplied_alpha: bool) {
        self.settings.premultiplied_alpha = premultiplied_alpha;
    }

    /// Current float capacity of the world-vertex scratch.
    #[inline]
    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    #[inline]
    #[must_use]
    pub fn clipper(&self) -> &C {
        &self.clipper
    }

    /// Replaces the sink's contents with this frame's geometry.
    ///
    /// On error the sink is left empty rather than holding a partial frame.
    pub fn build<S: GeometrySink>(&mut self, skeleton: &Skeleton, sink: &mut S) -> Result<()> {
        sink.clear_instances();
        let result = self.build_slots(skeleton, sink);
        self.clipper.clip_end();

        if let Err(err) = &result {
            log::error!("Skeleton geometry build aborted: {err}");
            sink.clear_instances();
        }
        result
    }

    fn build_slots<S: GeometrySink>(&mut self, skeleton: &Skeleton, sink: &mut S) -> Result<()> {
        let premultiplied = self.settings.premultiplied_alpha;
        let bones = skeleton.bones();
        let mut emitted = 0usize;

        for &slot_index in skeleton.draw_order() {
            let slot = &skeleton.slots()[slot_index];
            let Some(attachment) = slot.attachment() else {
                self.clipper.clip_end_slot(slot_index);
                continue;
            };

            let (texture, attachment_color, triangles, uvs, float_count) = match attachment.as_ref() {
                Attachment::Region(region) => {
                    let texture = resolve_texture(skeleton, slot_index, &region.name, region.texture.as_ref())?;
                    let Some(bone) = bones.get(slot.bone_index()) else {
                        self.clipper.clip_end_slot(slot_index);
                        continue;
                    };
                    let out = self.scratch.ensure(8);
                    region.compute_world_vertices(bone, out, 0, 2);
                    (texture, region.color, &QUAD_TRIANGLES[..], &region.uvs()[..], 8)
                }
                Attachment::Mesh(mesh) => {
                    let texture = resolve_texture(skeleton, slot_index, &mesh.name, mesh.texture.as_ref())?;
                    let float_count = mesh.world_vertices_length();
                    let out = self.scratch.ensure(float_count);
                    mesh.compute_world_vertices(bones, slot, out);
                    (texture, mesh.color, mesh.triangles(), mesh.uvs(), float_count)
                }
                Attachment::Clipping(clip) => {
                    self.clipper.clip_start(skeleton, slot_index, clip);
                    continue;
                }
                Attachment::BoundingBox(_) | Attachment::Point(_) => {
                    self.clipper.clip_end_slot(slot_index);
                    continue;
                }
            };

            let blend = BlendMode::for_slot(slot.blend(), premultiplied);
            let color = tint_color(skeleton.color, slot.color, attachment_color, premultiplied).to_rgba8();

            let (vertices, triangles, uvs) = if self.clipper.is_clipping() {
                self.clipper
                    .clip_triangles(&self.scratch.as_slice()[..float_count], triangles, uvs);
                (
                    self.clipper.clipped_vertices(),
                    self.clipper.clipped_triangles(),
                    self.clipper.clipped_uvs(),
                )
            } else {
                (&self.scratch.as_slice()[..float_count], triangles, uvs)
            };

            let vertex_count = vertices.len() / 2;
            if vertex_count > 0 && !triangles.is_empty() {
                let instance = sink.create_instance(slot_index, texture, blend, vertex_count, triangles.len());
                instance.indices.copy_from_slice(triangles);
                for (vertex, (position, uv)) in instance
                    .vertices
                    .iter_mut()
                    .zip(vertices.chunks_exact(2).zip(uvs.chunks_exact(2)))
                {
                    *vertex = SkeletonVertex {
                        position: [position[0], position[1], 0.0],
                        color,
                        uv: [uv[0], uv[1]],
                    };
                }
                emitted += 1;
            }

            self.clipper.clip_end_slot(slot_index);
        }

        log::trace!(
            "Built {emitted} geometry instances from {} slots",
            skeleton.draw_order().len()
        );
        Ok(())
    }
}

fn resolve_texture(
    skeleton: &Skeleton,
    slot_index: usize,
    attachment_name: &str,
    region: Option<&TextureRegion>,
) -> Result<TextureKey> {
    region.map(|r| r.texture).ok_or_else(|| SkeletonError::MissingTexture {
        slot: skeleton
            .slot_data(slot_index)
            .map_or_else(|| slot_index.to_string(), |data| data.name.clone()),
        attachment: attachment_name.to_string(),
    })
}
