//! Host node
//!
//! [`SkeletonNode`] is the thin scene-graph adapter: it owns a skeleton, a
//! builder and a geometry batch, rebuilds geometry on every `update`, and
//! answers layout queries from the bounding box calculator.

use std::sync::Arc;

use glam::Vec2;

use crate::attachment::Attachment;
use crate::bounds::{Rect, compute_bounds};
use crate::builder::SkeletonGeometryBuilder;
use crate::errors::{Result, SkeletonError};
use crate::geometry::GeometryBatch;
use crate::pose::{Bone, Skeleton, SkeletonData, Slot};
use crate::settings::RenderSettings;

pub struct SkeletonNode {
    skeleton: Skeleton,
    builder: SkeletonGeometryBuilder,
    geometry: GeometryBatch,

    /// Position in the parent's space.
    pub position: Vec2,
    /// Node scale applied to bounds.
    pub scale: Vec2,
}

impl SkeletonNode {
    #[must_use]
    pub fn new(skeleton: Skeleton, settings: RenderSettings) -> Self {
        Self {
            skeleton,
            builder: SkeletonGeometryBuilder::new(settings),
            geometry: GeometryBatch::new(),
            position: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }

    /// Instantiates a skeleton from shared setup data.
    pub fn from_data(data: Arc<SkeletonData>, settings: RenderSettings) -> Result<Self> {
        Ok(Self::new(Skeleton::new(data)?, settings))
    }

    /// Per-tick hook. The elapsed time only triggers the rebuild; the pose
    /// is expected to be advanced by the host beforehand.
    pub fn update(&mut self, _dt: f32) -> Result<()> {
        self.builder.build(&self.skeleton, &mut self.geometry)
    }

    /// Geometry of the last `update`.
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &GeometryBatch {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn builder(&self) -> &SkeletonGeometryBuilder {
        &self.builder
    }

    #[inline]
    #[must_use]
    pub fn premultiplied_alpha(&self) -> bool {
        self.builder.premultiplied_alpha()
    }

    pub fn set_premultiplied_alpha(&mut self, premultiplied_alpha: bool) {
        self.builder.set_premultiplied_alpha(premultiplied_alpha);
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Bounds of the current pose in the parent's space.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        compute_bounds(&self.skeleton, self.scale, self.position)
    }

    /// Size of [`bounding_box`](Self::bounding_box); zero when empty.
    #[must_use]
    pub fn content_size(&self) -> Vec2 {
        let bounds = self.bounding_box();
        if bounds.is_empty() { Vec2::ZERO } else { bounds.size }
    }

    // ========================================================================
    // Skeleton pass-throughs
    // ========================================================================

    pub fn update_world_transform(&mut self) {
        self.skeleton.update_world_transform();
    }

    pub fn set_to_setup_pose(&mut self) {
        self.skeleton.set_to_setup_pose();
    }

    pub fn set_bones_to_setup_pose(&mut self) {
        self.skeleton.set_bones_to_setup_pose();
    }

    pub fn set_slots_to_setup_pose(&mut self) {
        self.skeleton.set_slots_to_setup_pose();
    }

    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.skeleton.find_bone(name)
    }

    #[must_use]
    pub fn find_slot(&self, name: &str) -> Option<&Slot> {
        self.skeleton.find_slot(name)
    }

    pub fn set_skin(&mut self, skin_name: Option<&str>) -> Result<()> {
        self.skeleton.set_skin(skin_name)
    }

    /// Attachment `attachment_name` for slot `slot_name`, from the active
    /// skin or the default skin.
    pub fn get_attachment(&self, slot_name: &str, attachment_name: &str) -> Result<Arc<Attachment>> {
        let slot_index = self
            .skeleton
            .data()
            .find_slot(slot_name)
            .ok_or_else(|| SkeletonError::SlotNotFound(slot_name.to_string()))?;
        self.skeleton
            .get_attachment(slot_index, attachment_name)
            .ok_or_else(|| SkeletonError::AttachmentNotFound {
                slot: slot_name.to_string(),
                attachment: attachment_name.to_string(),
            })
    }

    pub fn set_attachment(&mut self, slot_name: &str, attachment_name: Option<&str>) -> Result<()> {
        self.skeleton.set_attachment(slot_name, attachment_name)
    }
}
