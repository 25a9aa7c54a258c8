//! Pose model
//!
//! The pose source read by the geometry builder:
//! - [`SkeletonData`]: immutable setup data (bones, slots, skins)
//! - [`Skeleton`]: a posed instance with world transforms and draw order
//! - [`Bone`] / [`Slot`]: runtime state of a single bone or slot
//! - [`Skin`]: named attachment sets
//!
//! Animation playback and constraint solving are out of scope; the host
//! writes local bone poses and slot state, then calls
//! [`Skeleton::update_world_transform`].

pub mod bone;
pub mod skeleton;
pub mod skin;
pub mod slot;

pub use bone::{Bone, BoneData};
pub use skeleton::{Skeleton, SkeletonData};
pub use skin::Skin;
pub use slot::{Slot, SlotBlend, SlotData};
