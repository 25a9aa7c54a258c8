//! Texture handles and atlas regions.
//!
//! Texture resolution happens once, when attachments are created and bound
//! to a skin. By the time the builder sees a slot, every renderable
//! attachment already carries a [`TextureRegion`] with a [`TextureKey`]; the
//! builder never looks textures up by name.

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle of a texture page owned by the rendering backend.
    pub struct TextureKey;
}

/// Metadata of one texture page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Registry of texture pages, keyed by [`TextureKey`].
///
/// This is a bookkeeping table only; pixel data and GPU textures live in the
/// backend that consumes the geometry.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: SlotMap<TextureKey, TextureInfo>,
}

impl TextureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, width: u32, height: u32) -> TextureKey {
        self.textures.insert(TextureInfo {
            name: name.to_string(),
            width,
            height,
        })
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: TextureKey) -> Option<&TextureInfo> {
        self.textures.get(key)
    }

    pub fn remove(&mut self, key: TextureKey) -> Option<TextureInfo> {
        self.textures.remove(key)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<TextureKey> {
        self.textures
            .iter()
            .find_map(|(key, info)| (info.name == name).then_some(key))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Builds a region from pixel coordinates on a registered page.
    ///
    /// Returns `None` when the key is not registered.
    #[must_use]
    pub fn region(
        &self,
        key: TextureKey,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rotate: bool,
    ) -> Option<TextureRegion> {
        let info = self.get(key)?;
        let page_w = info.width.max(1) as f32;
        let page_h = info.height.max(1) as f32;
        // Rotated regions are stored 90° clockwise in the page, so the packed
        // rectangle has width and height swapped.
        let (packed_w, packed_h) = if rotate { (height, width) } else { (width, height) };
        Some(TextureRegion {
            texture: key,
            u: x as f32 / page_w,
            v: y as f32 / page_h,
            u2: (x + packed_w) as f32 / page_w,
            v2: (y + packed_h) as f32 / page_h,
            rotate,
        })
    }
}

/// A rectangle of a texture page in normalized UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureRegion {
    pub texture: TextureKey,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    /// Region is stored rotated 90° clockwise in the page.
    pub rotate: bool,
}

impl TextureRegion {
    /// The whole page, unrotated.
    #[must_use]
    pub fn full(texture: TextureKey) -> Self {
        Self {
            texture,
            u: 0.0,
            v: 0.0,
            u2: 1.0,
            v2: 1.0,
            rotate: false,
        }
    }

    /// Maps a region-relative coordinate (`0..=1` on both axes, origin at the
    /// top-left of the unrotated image) to page UV space.
    #[inline]
    #[must_use]
    pub fn map_uv(&self, s: f32, t: f32) -> [f32; 2] {
        let width = self.u2 - self.u;
        let height = self.v2 - self.v;
        if self.rotate {
            [self.u + (1.0 - t) * width, self.v + s * height]
        } else {
            [self.u + s * width, self.v + t * height]
        }
    }
}
