//! Store error types shared by every `DocumentStore` backend.
//!
//! All errors are explicit, typed, and recoverable - no panics allowed.

use thiserror::Error;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Failed to connect to the database
    #[error("connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// Query execution failed
    #[error("query failed: {reason}")]
    QueryFailed { reason: String },

    /// A document with this filename is already stored
    #[error("document already exists: '{id}'")]
    AlreadyExists { id: String },

    /// Serialization/deserialization error
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The call did not finish in time
    #[error("operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Schema error
    #[error("schema error: {reason}")]
    Schema { reason: String },
}

impl StoreError {
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            reason: reason.into(),
        }
    }

    pub fn query_failed(reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            reason: reason.into(),
        }
    }

    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// Whether the next tick can reasonably expect a different outcome.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::QueryFailed { .. }
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
