//! Dynamic content element model for Folio.
//!
//! Content is stored as ordered JSON mappings whose shape is only known at
//! runtime. This crate provides one representation with three roles:
//! - [`ContentElement`]: a node backed by a mapping, with existence checks,
//!   typed get/apply helpers and a lazily filled cache of named sub-elements
//! - [`ContentItem`]: the root document, carrying [`ContentItemMetadata`]
//! - [`ContentPart`] / [`ContentField`]: named composites and leaves
//!
//! [`DynamicObject`] gives string-keyed, path-based access to the same data.
//! Every view of a document aliases one shared mapping; nothing is copied
//! when sub-elements are materialized.
//!
//! The model is single-threaded: documents are `!Send` and `!Sync`.

mod dynamic;
mod element;
mod error;
mod item;
mod part;
mod store;

pub use dynamic::DynamicObject;
pub use element::ContentElement;
pub use error::{kind_of, ContentError, Result};
pub use item::{ContentItem, ContentItemMetadata};
pub use part::{ContentField, ContentPart};
pub use store::SharedMap;
