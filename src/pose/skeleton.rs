use std::sync::Arc;

use glam::{Affine2, Vec2};
use uuid::Uuid;

use crate::attachment::Attachment;
use crate::color::Color;
use crate::errors::{Result, SkeletonError};
use crate::pose::{Bone, BoneData, Skin, Slot, SlotData};

/// Immutable setup data shared by every [`Skeleton`] instance built from it.
#[derive(Debug, Clone, Default)]
pub struct SkeletonData {
    pub name: String,
    /// Bones in hierarchy order: a parent always precedes its children.
    pub bones: Vec<BoneData>,
    /// Slots in setup draw order.
    pub slots: Vec<SlotData>,
    pub default_skin: Skin,
    pub skins: Vec<Skin>,
}

impl SkeletonData {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default_skin: Skin::new("default"),
            ..Default::default()
        }
    }

    /// Checks the structural invariants the runtime relies on.
    pub fn validate(&self) -> Result<()> {
        for (i, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent
                && parent >= i
            {
                return Err(SkeletonError::InvalidSkeleton(format!(
                    "bone '{}' (index {i}) has parent index {parent}, parents must precede children",
                    bone.name
                )));
            }
        }
        for slot in &self.slots {
            if slot.bone >= self.bones.len() {
                return Err(SkeletonError::IndexOutOfBounds {
                    context: format!("bone of slot '{}'", slot.name),
                    index: slot.bone,
                });
            }
        }
        for skin in std::iter::once(&self.default_skin).chain(&self.skins) {
            for (_, name, attachment) in skin.iter() {
                self.validate_attachment(name, attachment)?;
            }
        }
        Ok(())
    }

    /// Weighted vertices must bind existing bones; clip end slots must exist.
    fn validate_attachment(&self, name: &str, attachment: &Attachment) -> Result<()> {
        let (vertices, end_slot) = match attachment {
            Attachment::Mesh(mesh) => (mesh.vertices(), None),
            Attachment::Clipping(clip) => (&clip.vertices, clip.end_slot),
            Attachment::BoundingBox(bbox) => (&bbox.vertices, None),
            Attachment::Region(_) | Attachment::Point(_) => return Ok(()),
        };
        if let Some(bone) = vertices.max_bone()
            && bone >= self.bones.len()
        {
            return Err(SkeletonError::IndexOutOfBounds {
                context: format!("weighted bone of attachment '{name}'"),
                index: bone,
            });
        }
        if let Some(slot) = end_slot
            && slot >= self.slots.len()
        {
            return Err(SkeletonError::IndexOutOfBounds {
                context: format!("end slot of clipping attachment '{name}'"),
                index: slot,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    #[must_use]
    pub fn find_slot(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    #[must_use]
    pub fn find_skin(&self, name: &str) -> Option<usize> {
        self.skins.iter().position(|s| s.name == name)
    }
}

/// A posed skeleton instance: the pose source consumed by the builder and
/// the bounding box calculator.
///
/// The host mutates bones, slot colors, attachments and draw order between
/// frames, then calls [`update_world_transform`](Self::update_world_transform)
/// before geometry is built.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    data: Arc<SkeletonData>,

    bones: Vec<Bone>,
    slots: Vec<Slot>,
    draw_order: Vec<usize>,
    skin: Option<usize>,

    /// Skeleton-wide tint, multiplied into every slot.
    pub color: Color,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Skeleton {
    pub fn new(data: Arc<SkeletonData>) -> Result<Self> {
        data.validate()?;

        let bones = data
            .bones
            .iter()
            .enumerate()
            .map(|(i, bone)| Bone::new(i, bone))
            .collect();
        let slots = data
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| Slot::new(i, slot))
            .collect();
        let draw_order = (0..data.slots.len()).collect();

        let mut skeleton = Self {
            id: Uuid::new_v4(),
            data,
            bones,
            slots,
            draw_order,
            skin: None,
            color: Color::WHITE,
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        };
        skeleton.set_slots_to_setup_pose();
        skeleton.update_world_transform();
        Ok(skeleton)
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &Arc<SkeletonData> {
        &self.data
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    pub fn bones_mut(&mut self) -> &mut [Bone] {
        &mut self.bones
    }

    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[inline]
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    #[inline]
    #[must_use]
    pub fn slot_data(&self, slot_index: usize) -> Option<&SlotData> {
        self.data.slots.get(slot_index)
    }

    /// Slot indices in paint order (back to front).
    #[inline]
    #[must_use]
    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    /// Replaces the draw order. It must be a permutation of the slot indices.
    pub fn set_draw_order(&mut self, order: Vec<usize>) -> Result<()> {
        if order.len() != self.slots.len() {
            return Err(SkeletonError::InvalidDrawOrder(format!(
                "expected {} slots, got {}",
                self.slots.len(),
                order.len()
            )));
        }
        let mut seen = vec![false; order.len()];
        for &index in &order {
            match seen.get_mut(index) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(SkeletonError::InvalidDrawOrder(format!(
                        "slot {index} appears more than once"
                    )));
                }
                None => {
                    return Err(SkeletonError::IndexOutOfBounds {
                        context: "draw order slot".to_string(),
                        index,
                    });
                }
            }
        }
        self.draw_order = order;
        Ok(())
    }

    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.data.find_bone(name).map(|i| &self.bones[i])
    }

    pub fn find_bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.data.find_bone(name).map(|i| &mut self.bones[i])
    }

    #[must_use]
    pub fn find_slot(&self, name: &str) -> Option<&Slot> {
        self.data.find_slot(name).map(|i| &self.slots[i])
    }

    pub fn find_slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.data.find_slot(name).map(|i| &mut self.slots[i])
    }

    #[must_use]
    pub fn skin(&self) -> Option<&Skin> {
        self.skin.map(|i| &self.data.skins[i])
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Recomputes every bone's world transform from its local pose.
    ///
    /// Roots are placed by the skeleton's position and scale; children
    /// concatenate their parent's world transform.
    pub fn update_world_transform(&mut self) {
        let root = Affine2::from_translation(Vec2::new(self.x, self.y))
            * Affine2::from_scale(Vec2::new(self.scale_x, self.scale_y));

        for i in 0..self.bones.len() {
            let local = self.bones[i].local_matrix();
            let parent_world = match self.bones[i].parent_index() {
                Some(parent) => self.bones[parent].world,
                None => root,
            };
            self.bones[i].world = parent_world * local;
        }
    }

    // ========================================================================
    // Setup pose
    // ========================================================================

    pub fn set_to_setup_pose(&mut self) {
        self.set_bones_to_setup_pose();
        self.set_slots_to_setup_pose();
    }

    pub fn set_bones_to_setup_pose(&mut self) {
        for (bone, data) in self.bones.iter_mut().zip(&self.data.bones) {
            bone.set_to_setup_pose(data);
        }
    }

    /// Restores slot colors, setup attachments and the setup draw order.
    pub fn set_slots_to_setup_pose(&mut self) {
        self.draw_order = (0..self.slots.len()).collect();
        for i in 0..self.slots.len() {
            let data = &self.data.slots[i];
            self.slots[i].reset_color(data);
            let attachment = data
                .attachment_name
                .as_deref()
                .and_then(|name| self.get_attachment(i, name));
            self.slots[i].set_attachment(attachment);
        }
    }

    // ========================================================================
    // Skins & attachments
    // ========================================================================

    /// Looks an attachment up in the active skin, then in the default skin.
    #[must_use]
    pub fn get_attachment(&self, slot_index: usize, name: &str) -> Option<Arc<Attachment>> {
        self.skin()
            .and_then(|skin| skin.attachment(slot_index, name))
            .or_else(|| self.data.default_skin.attachment(slot_index, name))
            .cloned()
    }

    /// Sets a slot's attachment by name; `None` clears the slot.
    pub fn set_attachment(&mut self, slot_name: &str, attachment_name: Option<&str>) -> Result<()> {
        let slot_index = self
            .data
            .find_slot(slot_name)
            .ok_or_else(|| SkeletonError::SlotNotFound(slot_name.to_string()))?;

        let attachment = match attachment_name {
            Some(name) => Some(self.get_attachment(slot_index, name).ok_or_else(|| {
                SkeletonError::AttachmentNotFound {
                    slot: slot_name.to_string(),
                    attachment: name.to_string(),
                }
            })?),
            None => None,
        };
        self.slots[slot_index].set_attachment(attachment);
        Ok(())
    }

    /// Switches the active skin; `None` falls back to the default skin only.
    ///
    /// Without a previous skin, every slot's setup attachment is resolved in
    /// the new skin. Otherwise each attachment currently shown from the old
    /// skin is swapped for the new skin's attachment of the same name.
    pub fn set_skin(&mut self, skin_name: Option<&str>) -> Result<()> {
        let new_skin = match skin_name {
            Some(name) => Some(
                self.data
                    .find_skin(name)
                    .ok_or_else(|| SkeletonError::SkinNotFound(name.to_string()))?,
            ),
            None => None,
        };
        if new_skin == self.skin {
            return Ok(());
        }

        let data = Arc::clone(&self.data);
        if let Some(new_index) = new_skin {
            let new = &data.skins[new_index];
            match self.skin {
                Some(old_index) => {
                    for (slot_index, name, old_attachment) in data.skins[old_index].iter() {
                        let slot = &mut self.slots[slot_index];
                        let showing = slot
                            .attachment()
                            .is_some_and(|current| Arc::ptr_eq(current, old_attachment));
                        if showing && let Some(replacement) = new.attachment(slot_index, name) {
                            slot.set_attachment(Some(Arc::clone(replacement)));
                        }
                    }
                }
                None => {
                    for (slot_index, slot_data) in data.slots.iter().enumerate() {
                        if let Some(name) = slot_data.attachment_name.as_deref()
                            && let Some(attachment) = new.attachment(slot_index, name)
                        {
                            self.slots[slot_index].set_attachment(Some(Arc::clone(attachment)));
                        }
                    }
                }
            }
        }

        self.skin = new_skin;
        Ok(())
    }
}
