//! Mapping from SurrealDB failures onto the shared store error type.

use std::fmt;

use tsvwatch_core::StoreError;

/// Categorize a SurrealDB error by its message.
pub fn from_surrealdb_error(err: impl fmt::Display) -> StoreError {
    let msg = err.to_string();

    if msg.contains("timeout") || msg.contains("Timeout") {
        StoreError::timeout(0)
    } else if msg.contains("connection") || msg.contains("Connection") || msg.contains("connect")
    {
        StoreError::connection_failed(msg)
    } else if msg.contains("already contains") || msg.contains("already exists") {
        StoreError::already_exists(msg)
    } else if msg.contains("serializ") || msg.contains("deserializ") {
        StoreError::serialization(msg)
    } else {
        StoreError::query_failed(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = from_surrealdb_error("operation timeout after 30s");
        assert!(matches!(err, StoreError::Timeout { .. }));
    }

    #[test]
    fn test_connection_message() {
        let err = from_surrealdb_error("connection refused");
        assert!(matches!(err, StoreError::ConnectionFailed { .. }));
    }

    #[test]
    fn test_unique_index_violation() {
        let err = from_surrealdb_error(
            "Database index `documents_name` already contains 'a.tsv', with record `documents:x`",
        );
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn test_generic_message() {
        let err = from_surrealdb_error("some random error");
        assert!(matches!(err, StoreError::QueryFailed { .. }));
    }
}
