#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Per-frame geometry synthesis for 2D skinned skeletons.
//!
//! A posed [`Skeleton`] goes in; an ordered list of textured, tinted,
//! clipped geometry instances comes out, ready for a GPU renderer.

pub mod attachment;
pub mod bounds;
pub mod builder;
pub mod clipping;
pub mod color;
pub mod errors;
pub mod geometry;
pub mod node;
pub mod pose;
pub mod settings;
pub mod texture;

pub use attachment::{
    Attachment, BoneWeight, ClippingAttachment, MeshAttachment, RegionAttachment, VertexData,
};
pub use bounds::{Rect, compute_bounds};
pub use builder::{SkeletonGeometryBuilder, VertexScratch};
pub use clipping::{ClipState, Clipper, SkeletonClipper};
pub use color::Color;
pub use errors::{Result, SkeletonError};
pub use geometry::{BlendMode, GeometryBatch, GeometryInstance, GeometrySink, SkeletonVertex};
pub use node::SkeletonNode;
pub use pose::{Bone, BoneData, Skeleton, SkeletonData, Skin, Slot, SlotBlend, SlotData};
pub use settings::RenderSettings;
pub use texture::{TextureKey, TextureRegion, TextureRegistry};
