//! Error types for query validation and resolution.

use folio_model::ContentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query depth {depth} exceeds the maximum of {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("query complexity {cost} exceeds the maximum of {max}")]
    ComplexityExceeded { cost: f64, max: f64 },

    #[error("requested {requested} results, the maximum is {max}")]
    ResultLimitExceeded { requested: usize, max: usize },

    #[error("permission denied: cannot read content of type '{content_type}'")]
    PermissionDenied { content_type: String },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("invalid query settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl QueryError {
    /// Validation failures describe the query, not the server, and are safe
    /// to report regardless of exception exposure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DepthExceeded { .. }
                | Self::ComplexityExceeded { .. }
                | Self::ResultLimitExceeded { .. }
                | Self::PermissionDenied { .. }
        )
    }
}
