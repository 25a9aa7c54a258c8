use serde::{Deserialize, Serialize};

/// Linear RGBA tint with channels in `0.0..=1.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise product of two tints.
    #[inline]
    #[must_use]
    pub fn modulate(self, other: Self) -> Self {
        Self::new(
            self.r * other.r,
            self.g * other.g,
            self.b * other.b,
            self.a * other.a,
        )
    }

    /// RGB scaled by alpha, alpha unchanged.
    #[inline]
    #[must_use]
    pub fn premultiplied(self) -> Self {
        Self::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    /// Converts to 8-bit channels. Each channel is clamped to `[0, 1]` and
    /// truncated after scaling by 255.
    #[inline]
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    // NaN clamps to 0 through the saturating cast.
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Final vertex tint for one attachment.
///
/// Alpha is always `skeleton.a * slot.a * attachment.a`. RGB is the product
/// of the three tints, additionally scaled by that alpha when the output is
/// going to be composited with premultiplied-alpha blending.
#[must_use]
pub fn tint_color(skeleton: Color, slot: Color, attachment: Color, premultiplied_alpha: bool) -> Color {
    let tint = skeleton.modulate(slot).modulate(attachment);
    if premultiplied_alpha {
        tint.premultiplied()
    } else {
        tint
    }
}
