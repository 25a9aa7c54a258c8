//! Geometry output
//!
//! What the builder hands to the renderer:
//! - [`SkeletonVertex`]: the vertex format, with its wgpu layout
//! - [`BlendMode`]: per-instance blend state, with its wgpu blend state
//! - [`GeometrySink`]: where instances are created
//! - [`GeometryBatch`]: the default sink, with draw-run merging and flattening

pub mod batch;
pub mod blend;
pub mod vertex;

pub use batch::{DrawCommand, DrawRun, FlatGeometry, GeometryBatch, GeometryInstance, GeometrySink};
pub use blend::BlendMode;
pub use vertex::SkeletonVertex;
