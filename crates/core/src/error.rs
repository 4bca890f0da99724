//! Unified error types for the aggregation engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the aggregation engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw event window could not be read. Fatal for an aggregation
    /// run: no facet writes happen after a fetch failure.
    #[error("event fetch failed: {0}")]
    Fetch(String),

    /// An aggregate collection read or upsert failed.
    #[error("aggregate store error: {0}")]
    Store(String),

    /// A collection name was requested that the store was not configured
    /// with.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::Fetch(_)
            | Self::Store(_)
            | Self::UnknownCollection(_)
            | Self::Serialization(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "FETCH_FAILED",
            Self::Store(_) => "STORE_FAILED",
            Self::UnknownCollection(_) => "STORE_MISCONFIGURED",
            Self::InvalidArgument(_) => "INVALID_REQUEST",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}
