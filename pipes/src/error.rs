use thiserror::Error;

use crate::api::{ApiError, ErrorKind};
use crate::ids::IdError;

#[derive(Debug, Error)]
pub enum PipesError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("attribute {attribute} is not valid JSON: {message}")]
    InvalidJson { attribute: String, message: String },

    #[error("{0} has no attributes that can be updated in place")]
    Immutable(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("provider is not configured")]
    NotConfigured,
}

impl PipesError {
    /// HTTP status from the server, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PipesError::Api(e) => e.status(),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            PipesError::Api(e) => Some(e.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipesError>;
