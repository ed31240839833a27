//! Query-side consumers of the Folio content model.
//!
//! - [`QuerySettings`]: depth, complexity and result-count configuration,
//!   loaded from TOML with defaults
//! - [`QueryLimits`]: settings resolved against a [`HostEnvironment`]
//! - [`FieldResolver`]: resolves dotted field paths against content items,
//!   enforcing limits and a [`ContentPermissions`] policy
//!
//! None of these alter content; they only read what the model exposes.

mod error;
mod limits;
mod resolver;
mod settings;

pub use error::{QueryError, Result};
pub use limits::{QueryLimits, DEFAULT_FIELD_IMPACT};
pub use resolver::{AllowAll, ContentPermissions, FieldResolver};
pub use settings::{
    HostEnvironment, QuerySettings, ResultCountMode, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_NUMBER_OF_RESULTS, DEFAULT_NUMBER_OF_RESULTS,
};
