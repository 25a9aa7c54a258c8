//! Render Settings
//!
//! Host-facing configuration for the geometry builder.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skeleton_batch::RenderSettings;
//!
//! // Straight alpha, the default
//! let settings = RenderSettings::default();
//!
//! // Atlas pages exported with premultiplied alpha
//! let settings = RenderSettings {
//!     premultiplied_alpha: true,
//!     ..Default::default()
//! };
//!
//! // From a JSON config file
//! let settings = RenderSettings::from_json_str(r#"{ "premultiplied_alpha": true }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default float capacity of the builder's vertex scratch (one quad).
pub const DEFAULT_SCRATCH_FLOATS: usize = 8;

/// Configuration consumed by [`SkeletonGeometryBuilder`](crate::builder::SkeletonGeometryBuilder).
///
/// | Field                    | Description                                  | Default |
/// |--------------------------|----------------------------------------------|---------|
/// | `premultiplied_alpha`    | Emit premultiplied RGB and premultiplied blend | `false` |
/// | `initial_scratch_floats` | Starting capacity of the vertex scratch       | `8`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// When `true`, RGB channels are pre-multiplied by alpha and the blend
    /// state switches to premultiplied-alpha compositing. When `false`, RGB
    /// is emitted straight with non-premultiplied (or additive) blending.
    pub premultiplied_alpha: bool,

    /// Initial number of floats reserved for world vertices. The scratch
    /// grows on demand; this only avoids early reallocations for skeletons
    /// with known large meshes.
    pub initial_scratch_floats: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            premultiplied_alpha: false,
            initial_scratch_floats: DEFAULT_SCRATCH_FLOATS,
        }
    }
}

impl RenderSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
