use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::color::Color;

/// Blend mode declared by a slot in the setup data.
///
/// Only [`Additive`](Self::Additive) changes the emitted blend state; the
/// other modes composite like [`Normal`](Self::Normal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotBlend {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
}

/// Setup-pose definition of a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotData {
    pub name: String,
    pub bone: usize,
    pub color: Color,
    /// Attachment looked up in the skins when the slot is reset.
    pub attachment_name: Option<String>,
    pub blend: SlotBlend,
}

impl SlotData {
    #[must_use]
    pub fn new(name: &str, bone: usize) -> Self {
        Self {
            name: name.to_string(),
            bone,
            color: Color::WHITE,
            attachment_name: None,
            blend: SlotBlend::Normal,
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment_name: &str) -> Self {
        self.attachment_name = Some(attachment_name.to_string());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_blend(mut self, blend: SlotBlend) -> Self {
        self.blend = blend;
        self
    }
}

/// Runtime slot: a draw-order position holding zero or one attachment.
#[derive(Debug, Clone)]
pub struct Slot {
    data_index: usize,
    pub(crate) bone: usize,
    pub(crate) blend: SlotBlend,
    pub color: Color,
    attachment: Option<Arc<Attachment>>,
    /// Vertex deformation for the current attachment. For unweighted
    /// vertices it replaces the local positions, for weighted vertices it
    /// holds one offset per bone influence. Cleared whenever the attachment
    /// changes.
    pub deform: Vec<f32>,
}

impl Slot {
    pub(crate) fn new(data_index: usize, data: &SlotData) -> Self {
        Self {
            data_index,
            bone: data.bone,
            blend: data.blend,
            color: data.color,
            attachment: None,
            deform: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn data_index(&self) -> usize {
        self.data_index
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self) -> usize {
        self.bone
    }

    #[inline]
    #[must_use]
    pub fn blend(&self) -> SlotBlend {
        self.blend
    }

    #[inline]
    #[must_use]
    pub fn attachment(&self) -> Option<&Arc<Attachment>> {
        self.attachment.as_ref()
    }

    /// Replaces the attachment. Deform data belongs to the previous
    /// attachment and is dropped when the attachment actually changes.
    pub fn set_attachment(&mut self, attachment: Option<Arc<Attachment>>) {
        let same = match (&self.attachment, &attachment) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.deform.clear();
        }
        self.attachment = attachment;
    }

    pub(crate) fn reset_color(&mut self, data: &SlotData) {
        self.color = data.color;
    }
}
