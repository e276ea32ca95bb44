use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::Poem;
use crate::store::{StorageSession, StoreError};

use super::Snapshot;

pub struct ReadCache {
    storage: Arc<StorageSession>,
    snapshot: watch::Sender<Snapshot>,
}

impl ReadCache {
    pub fn new(storage: Arc<StorageSession>) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::empty());
        Self { storage, snapshot }
    }

    /// Read every poem from the local store, in primary-key order.
    pub async fn load_all(&self) -> Result<Vec<Poem>, StoreError> {
        let store = self.storage.open_or_reuse().await?;
        store.load_poems().await
    }

    /// Load a fresh snapshot and publish it to every subscriber.
    /// On error the previous snapshot stays in place.
    pub async fn reload(&self) -> Result<Snapshot, StoreError> {
        let snapshot = Snapshot::new(self.load_all().await?);
        debug!(count = snapshot.len(), "Read cache reloaded");
        self.snapshot.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }
}
