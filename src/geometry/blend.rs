use serde::{Deserialize, Serialize};

use crate::pose::SlotBlend;

/// Blend state of a geometry instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// `src * src.a + dst * (1 - src.a)`, for straight-alpha colors.
    #[default]
    NonPremultiplied,
    /// `src + dst * (1 - src.a)`, for premultiplied colors.
    PremultipliedAlpha,
    /// `src * src.a + dst`.
    Additive,
}

impl BlendMode {
    /// Blend state for a slot.
    ///
    /// Additive slots stay additive; every other slot composites with the
    /// alpha convention of the output colors.
    #[inline]
    #[must_use]
    pub fn for_slot(blend: SlotBlend, premultiplied_alpha: bool) -> Self {
        match blend {
            SlotBlend::Additive => Self::Additive,
            SlotBlend::Normal | SlotBlend::Multiply | SlotBlend::Screen => {
                if premultiplied_alpha {
                    Self::PremultipliedAlpha
                } else {
                    Self::NonPremultiplied
                }
            }
        }
    }

    /// Equivalent wgpu blend state.
    #[must_use]
    pub fn blend_state(self) -> wgpu::BlendState {
        match self {
            Self::NonPremultiplied => wgpu::BlendState::ALPHA_BLENDING,
            Self::PremultipliedAlpha => wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            Self::Additive => {
                let component = wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                };
                wgpu::BlendState {
                    color: component,
                    alpha: component,
                }
            }
        }
    }
}
