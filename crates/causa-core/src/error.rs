//! Core error types for causa-core.
//!
//! The taxonomy mirrors how callers are expected to react:
//! - [`CoreError::InvalidArgument`] is a caller bug; it fails fast and is
//!   never coerced into a default.
//! - [`ApiError`] is an external-service failure; the monitoring runner
//!   records it as an audit entry and keeps going.
//! - [`StoreError`] is a persistence-boundary failure reported by the
//!   collaborator that owns the actual writes.
//!
//! Malformed individual records during aggregation and the eligibility
//! gate declining to poll are *not* errors; they surface as a skipped
//! counter and a [`crate::monitoring::runner::CheckOutcome::Throttled`]
//! outcome respectively.

use thiserror::Error;

/// Core error type for causa-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A caller supplied an argument that violates a function contract.
    #[error("Invalid argument for '{field}': {message}")]
    InvalidArgument { field: &'static str, message: String },

    /// Case-tracking API errors
    #[error("Case-tracking API error: {0}")]
    Api(#[from] ApiError),

    /// Persistence-boundary errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the external case-tracking API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The configured base URL does not parse.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Case-tracking API returned HTTP {status}")]
    Status { status: u16 },

    /// The response body did not match the expected movement envelope.
    #[error("Unparsable response body: {0}")]
    Body(String),
}

/// Errors reported by the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditional or append write was rejected.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// The store is unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
