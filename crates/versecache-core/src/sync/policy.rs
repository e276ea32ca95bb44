use async_trait::async_trait;

use crate::store::{StoreError, StoreHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Populate,
    Skip,
}

/// Decides whether the store needs to be populated from the remote.
#[async_trait]
pub trait SyncPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn decide(&self, store: &StoreHandle) -> Result<SyncDecision, StoreError>;
}

/// Populate only when the poems table is empty. A store with any rows is
/// treated as already synced, accepting staleness.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyStoreSyncPolicy;

#[async_trait]
impl SyncPolicy for EmptyStoreSyncPolicy {
    fn name(&self) -> &'static str {
        "empty-store"
    }

    async fn decide(&self, store: &StoreHandle) -> Result<SyncDecision, StoreError> {
        let existing = store.count_poems().await?;
        Ok(if existing == 0 {
            SyncDecision::Populate
        } else {
            SyncDecision::Skip
        })
    }
}
