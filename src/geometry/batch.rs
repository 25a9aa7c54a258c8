use crate::geometry::{BlendMode, SkeletonVertex};
use crate::texture::TextureKey;

/// One draw call's worth of geometry produced from a single slot.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInstance {
    /// Slot the geometry was built from.
    pub slot_index: usize,
    pub texture: TextureKey,
    pub blend: BlendMode,
    pub vertices: Vec<SkeletonVertex>,
    /// Indices into `vertices`.
    pub indices: Vec<u32>,
}

/// Receives the builder's output.
pub trait GeometrySink {
    /// Drops every instance of the previous frame.
    fn clear_instances(&mut self);

    /// Appends an instance with `vertex_count` zeroed vertices and
    /// `index_count` zeroed indices, ready to be filled in.
    fn create_instance(
        &mut self,
        slot_index: usize,
        texture: TextureKey,
        blend: BlendMode,
        vertex_count: usize,
        index_count: usize,
    ) -> &mut GeometryInstance;
}

/// Adjacent instances sharing texture and blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRun {
    pub texture: TextureKey,
    pub blend: BlendMode,
    pub first_instance: usize,
    pub instance_count: usize,
}

/// A range of a flattened index buffer drawn with one texture/blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub texture: TextureKey,
    pub blend: BlendMode,
    pub index_start: u32,
    pub index_count: u32,
}

/// Single vertex/index buffer pair for upload, with one command per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatGeometry {
    pub vertices: Vec<SkeletonVertex>,
    pub indices: Vec<u32>,
    pub commands: Vec<DrawCommand>,
}

/// Default [`GeometrySink`]: an ordered list of instances whose buffers are
/// recycled across frames.
#[derive(Debug, Default)]
pub struct GeometryBatch {
    instances: Vec<GeometryInstance>,
    pool: Vec<GeometryInstance>,
}

impl GeometryBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances in paint order.
    #[inline]
    #[must_use]
    pub fn instances(&self) -> &[GeometryInstance] {
        &self.instances
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Released instances waiting for reuse.
    #[inline]
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.instances.iter().map(|i| i.vertices.len()).sum()
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.instances.iter().map(|i| i.indices.len()).sum()
    }

    /// Groups adjacent instances with equal texture and blend state.
    /// Order is preserved; non-adjacent instances are never merged.
    #[must_use]
    pub fn draw_runs(&self) -> Vec<DrawRun> {
        let mut runs: Vec<DrawRun> = Vec::new();
        for (i, instance) in self.instances.iter().enumerate() {
            if let Some(last) = runs.last_mut()
                && last.texture == instance.texture
                && last.blend == instance.blend
            {
                last.instance_count += 1;
                continue;
            }
            runs.push(DrawRun {
                texture: instance.texture,
                blend: instance.blend,
                first_instance: i,
                instance_count: 1,
            });
        }
        runs
    }

    /// Concatenates every instance into one vertex and one index buffer,
    /// rebasing indices, with one draw command per run.
    #[must_use]
    pub fn flatten(&self) -> FlatGeometry {
        let mut flat = FlatGeometry {
            vertices: Vec::with_capacity(self.vertex_count()),
            indices: Vec::with_capacity(self.index_count()),
            commands: Vec::new(),
        };

        for run in self.draw_runs() {
            let index_start = flat.indices.len() as u32;
            for instance in &self.instances[run.first_instance..run.first_instance + run.instance_count] {
                let base = flat.vertices.len() as u32;
                flat.vertices.extend_from_slice(&instance.vertices);
                flat.indices.extend(instance.indices.iter().map(|&i| base + i));
            }
            flat.commands.push(DrawCommand {
                texture: run.texture,
                blend: run.blend,
                index_start,
                index_count: flat.indices.len() as u32 - index_start,
            });
        }
        flat
    }
}

impl GeometrySink for GeometryBatch {
    fn clear_instances(&mut self) {
        self.pool.append(&mut self.instances);
    }

    fn create_instance(
        &mut self,
        slot_index: usize,
        texture: TextureKey,
        blend: BlendMode,
        vertex_count: usize,
        index_count: usize,
    ) -> &mut GeometryInstance {
        let mut instance = self.pool.pop().unwrap_or_else(|| GeometryInstance {
            slot_index,
            texture,
            blend,
            vertices: Vec::new(),
            indices: Vec::new(),
        });
        instance.slot_index = slot_index;
        instance.texture = texture;
        instance.blend = blend;
        instance.vertices.clear();
        instance.vertices.resize(vertex_count, SkeletonVertex::default());
        instance.indices.clear();
        instance.indices.resize(index_count, 0);

        self.instances.push(instance);
        let last = self.instances.len() - 1;
        &mut self.instances[last]
    }
}
