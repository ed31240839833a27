//! Core type definitions for Folio.
//!
//! This crate defines the small, model-agnostic types shared by the content
//! model and its consumers:
//! - Content item and version identifiers (UUID v7)
//! - Property paths used by the dynamic view (`Body.Text`, `Items.0.Title`)
//!
//! Content structure itself (parts, fields, their JSON payloads) lives in
//! `folio-model`, not here.

mod ids;
mod path;

pub use ids::{ContentItemId, ContentItemVersionId};
pub use path::{normalize_path, PropertyPath};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid path component '{component}': {reason}")]
    InvalidPathComponent { component: String, reason: String },
}
