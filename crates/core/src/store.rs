//! The contract between the pipeline and whatever persists documents.
//!
//! Ingestion writes through [`DocumentStore::insert_batch`] and reads the
//! processed set through [`DocumentStore::processed_names`]; the query API
//! only ever calls [`DocumentStore::list_documents`].

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};

/// Storage backend for ingested documents.
///
/// Implementations must be safe to share between the ingestion task and
/// concurrent HTTP handlers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Filenames of every document already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn processed_names(&self) -> StoreResult<HashSet<String>>;

    /// Persist a batch of documents in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be written. No partial
    /// success is reported.
    async fn insert_batch(&self, documents: Vec<Document>) -> StoreResult<()>;

    /// One window of stored documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn list_documents(&self, skip: u64, limit: u64) -> StoreResult<Vec<Document>>;
}

/// Run a store call with an upper bound on its duration.
///
/// Expiry turns into [`StoreError::Timeout`], the same failure the call
/// itself would report.
///
/// # Errors
///
/// Returns the call's own error, or `Timeout` if it did not finish in time.
pub async fn bounded<T, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
        Err(StoreError::timeout(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        ))
    })
}
