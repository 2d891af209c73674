//! Error Types
//!
//! Failures the board can hit. All of them are caught and logged at the
//! handler that triggered them; none roll back an optimistic UI change.

use thiserror::Error;

/// Failure talking to the card endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Request never completed
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Response body was not what we expected
    #[error("unexpected response body: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Board-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("transport error: {0}")]
    Transport(#[from] StoreError),

    #[error("category '{0}' does not exist")]
    CategoryNotFound(String),

    #[error("card id is missing or invalid")]
    InvalidCardId,

    #[error("drag payload is missing its source or target")]
    MalformedGesture,
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Config could not be used as given
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no categories configured")]
    NoCategories,

    #[error("api url is empty")]
    EmptyApiUrl,
}
