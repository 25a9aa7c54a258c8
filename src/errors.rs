//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`SkeletonError`] covers the failure modes of pose
//! setup and geometry building:
//! - Unresolved texture regions on renderable attachments
//! - Name lookups (slots, skins, attachments)
//! - Structural validation of skeleton and mesh data
//! - Settings parsing
//!
//! Degenerate geometry and unknown attachment kinds are *not* errors; the
//! builder skips them silently.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, SkeletonError>`.
//!
//! ```rust,ignore
//! use skeleton_batch::errors::{SkeletonError, Result};
//!
//! fn rebuild(node: &mut SkeletonNode) -> Result<()> {
//!     node.update(1.0 / 60.0)
//! }
//! ```

use thiserror::Error;

/// The main error type for skeleton geometry building.
#[derive(Error, Debug)]
pub enum SkeletonError {
    // ========================================================================
    // Rendering Errors
    // ========================================================================
    /// A Region or Mesh attachment reached the builder without a resolved
    /// texture region. There is no sane fallback, so the frame is aborted.
    #[error("Attachment '{attachment}' on slot '{slot}' has no resolved texture")]
    MissingTexture {
        /// Name of the slot being drawn
        slot: String,
        /// Name of the attachment
        attachment: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// No slot with the given name.
    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    /// No skin with the given name.
    #[error("Skin not found: {0}")]
    SkinNotFound(String),

    /// Neither the active skin nor the default skin holds the attachment.
    #[error("Attachment not found: {slot}/{attachment}")]
    AttachmentNotFound {
        /// Slot name used for the lookup
        slot: String,
        /// Attachment name used for the lookup
        attachment: String,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Skeleton setup data is structurally invalid.
    #[error("Invalid skeleton data: {0}")]
    InvalidSkeleton(String),

    /// Mesh or clipping vertex data is inconsistent.
    #[error("Invalid mesh '{name}': {reason}")]
    InvalidMesh {
        /// Attachment name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// A draw order that is not a permutation of the slot indices.
    #[error("Invalid draw order: {0}")]
    InvalidDrawOrder(String),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, SkeletonError>`.
pub type Result<T> = std::result::Result<T, SkeletonError>;
