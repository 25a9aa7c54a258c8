use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::pose::{Bone, Slot};

/// One bone influence of a weighted vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneWeight {
    pub bone: usize,
    /// Vertex position in the bone's local space.
    pub position: Vec2,
    pub weight: f32,
}

/// Influences of a single weighted vertex. Most vertices are bound to at
/// most four bones.
pub type VertexWeights = SmallVec<[BoneWeight; 4]>;

/// Local vertex data of a mesh-like attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VertexData {
    /// Positions in the slot bone's local space.
    Unweighted(Vec<Vec2>),
    /// Per-vertex bone influences.
    Weighted(Vec<VertexWeights>),
}

impl Default for VertexData {
    fn default() -> Self {
        Self::Unweighted(Vec::new())
    }
}

impl VertexData {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Unweighted(v) => v.len(),
            Self::Weighted(v) => v.len(),
        }
    }

    /// Number of floats needed to hold the world vertices (x, y per vertex).
    #[inline]
    #[must_use]
    pub fn world_vertices_length(&self) -> usize {
        self.vertex_count() * 2
    }

    /// Largest bone index referenced, if any.
    #[must_use]
    pub fn max_bone(&self) -> Option<usize> {
        match self {
            Self::Unweighted(_) => None,
            Self::Weighted(v) => v.iter().flatten().map(|w| w.bone).max(),
        }
    }

    /// Skins the vertices into `out` as interleaved `x, y` pairs.
    ///
    /// Unweighted vertices are transformed by the slot's bone; a deform
    /// buffer sized for every vertex replaces the local positions.
    /// Weighted vertices sum each influence transformed by its own bone,
    /// with the deform buffer (when present) adding an offset per influence.
    ///
    /// `out` must hold at least [`world_vertices_length`](Self::world_vertices_length)
    /// floats. Influences on unknown bones contribute nothing.
    pub fn compute_world_vertices(&self, bones: &[Bone], slot: &Slot, out: &mut [f32]) {
        let deform = slot.deform.as_slice();
        match self {
            Self::Unweighted(vertices) => {
                let Some(bone) = bones.get(slot.bone_index()) else {
                    return;
                };
                let use_deform = deform.len() >= vertices.len() * 2;
                for (i, (local, dst)) in vertices.iter().zip(out.chunks_exact_mut(2)).enumerate() {
                    let local = if use_deform {
                        Vec2::new(deform[i * 2], deform[i * 2 + 1])
                    } else {
                        *local
                    };
                    let world = bone.local_to_world(local);
                    dst[0] = world.x;
                    dst[1] = world.y;
                }
            }
            Self::Weighted(vertices) => {
                let mut f = 0;
                for (weights, dst) in vertices.iter().zip(out.chunks_exact_mut(2)) {
                    let mut world = Vec2::ZERO;
                    for influence in weights {
                        let offset = match deform.get(f..f + 2) {
                            Some(d) => Vec2::new(d[0], d[1]),
                            None => Vec2::ZERO,
                        };
                        f += 2;
                        let Some(bone) = bones.get(influence.bone) else {
                            continue;
                        };
                        world += bone.local_to_world(influence.position + offset) * influence.weight;
                    }
                    dst[0] = world.x;
                    dst[1] = world.y;
                }
            }
        }
    }
}
