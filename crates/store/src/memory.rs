//! In-memory document store.
//!
//! Behaves like the SurrealDB store as far as the pipeline can observe:
//! filenames are unique, a batch containing a known filename is rejected
//! whole, and listing follows insertion order.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tsvwatch_core::{Document, DocumentStore, StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with documents, as if ingested earlier.
    #[must_use]
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    /// Snapshot of everything stored.
    pub async fn snapshot(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn processed_names(&self) -> StoreResult<HashSet<String>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().map(|document| document.id.clone()).collect())
    }

    async fn insert_batch(&self, batch: Vec<Document>) -> StoreResult<()> {
        let mut documents = self.documents.write().await;

        let mut seen: HashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        if let Some(duplicate) = batch.iter().find(|d| !seen.insert(d.id.as_str())) {
            return Err(StoreError::already_exists(duplicate.id.clone()));
        }

        documents.extend(batch);
        Ok(())
    }

    async fn list_documents(&self, skip: u64, limit: u64) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read().await;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(documents.iter().skip(skip).take(limit).cloned().collect())
    }
}
