//! The processed set: filenames the store already holds.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tsvwatch_core::{DocumentStore, StoreResult, bounded};

/// Reads the processed set from the store, once per cycle.
///
/// The set is a point-in-time snapshot. It is never updated in place; the
/// next cycle simply asks again.
#[derive(Clone)]
pub struct ProcessedSetTracker {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl ProcessedSetTracker {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Current set of stored filenames.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails or does not answer within
    /// the timeout. A cycle must not scan without this set.
    pub async fn current_processed(&self) -> StoreResult<HashSet<String>> {
        let names = bounded(self.timeout, self.store.processed_names()).await?;
        debug!(processed = names.len(), "Processed set refreshed");
        Ok(names)
    }
}

impl std::fmt::Debug for ProcessedSetTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedSetTracker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
