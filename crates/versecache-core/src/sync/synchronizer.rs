use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::remote::{PoemSource, RemoteError, RemoteRecord};
use crate::store::{StorageSession, StoreHandle};

use super::{EmptyStoreSyncPolicy, InsertFailure, SyncDecision, SyncFailure, SyncPolicy, SyncResult};

/// Timeout for one remote fetch attempt in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for transient remote failures.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds, doubled after each retry.
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub fetch_timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
        }
    }
}

impl SyncOptions {
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            fetch_timeout: config
                .fetch_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            max_retries: config.max_retries.unwrap_or(defaults.max_retries),
            initial_backoff: defaults.initial_backoff,
        }
    }
}

/// Populates the local store from the remote source when the policy allows.
/// Clone is cheap. Every synchronizer over one `StorageSession` shares that
/// session's in-flight sync.
#[derive(Clone)]
pub struct Synchronizer {
    worker: Arc<SyncWorker>,
}

struct SyncWorker {
    storage: Arc<StorageSession>,
    source: Arc<dyn PoemSource>,
    policy: Arc<dyn SyncPolicy>,
    options: SyncOptions,
}

impl Synchronizer {
    pub fn new(
        storage: Arc<StorageSession>,
        source: Arc<dyn PoemSource>,
        options: SyncOptions,
    ) -> Self {
        Self::with_policy(storage, source, Arc::new(EmptyStoreSyncPolicy), options)
    }

    pub fn with_policy(
        storage: Arc<StorageSession>,
        source: Arc<dyn PoemSource>,
        policy: Arc<dyn SyncPolicy>,
        options: SyncOptions,
    ) -> Self {
        Self {
            worker: Arc::new(SyncWorker {
                storage,
                source,
                policy,
                options,
            }),
        }
    }

    /// Whether a sync into this synchronizer's store is currently running.
    pub fn is_syncing(&self) -> bool {
        self.worker.storage.sync_flight().is_running()
    }

    /// Populate the local store from the remote source if the policy says the
    /// store needs it.
    ///
    /// If a sync into the same store is already running, this call joins it
    /// and returns the same result instead of checking the store again. The
    /// joined run uses the source and policy of the synchronizer that started
    /// it.
    pub async fn sync_if_empty(&self) -> SyncResult {
        let worker = Arc::clone(&self.worker);
        self.worker
            .storage
            .sync_flight()
            .run(move || async move { worker.run().await })
            .await
    }
}

impl SyncWorker {
    async fn run(&self) -> SyncResult {
        let store = match self.storage.open_or_reuse().await {
            Ok(store) => store,
            Err(e) => {
                error!(error = %e, "Local store unavailable, cannot sync");
                return SyncResult::Failed(SyncFailure::StorageUnavailable(e.to_string()));
            }
        };

        match self.policy.decide(&store).await {
            Ok(SyncDecision::Skip) => {
                info!(policy = self.policy.name(), "Local store already populated, skipping sync");
                return SyncResult::Skipped;
            }
            Ok(SyncDecision::Populate) => {}
            Err(e) => {
                error!(error = %e, "Failed to inspect local store");
                return SyncResult::Failed(SyncFailure::Storage(e.to_string()));
            }
        }

        info!(source = self.source.name(), "Fetching poems from remote source");
        let records = match self.fetch_with_retry().await {
            Ok(records) => records,
            Err(failure) => {
                warn!(error = %failure, "Sync failed, local store left untouched");
                return SyncResult::Failed(failure);
            }
        };

        let (inserted, failures) = Self::populate(&store, records).await;
        info!(inserted, failed = failures.len(), "Remote poems saved to local store");
        SyncResult::Populated { inserted, failures }
    }

    /// Fetch with a timeout per attempt and exponential backoff on transient
    /// failures. A timeout is final, whether it is ours or the transport's.
    async fn fetch_with_retry(&self) -> Result<Vec<RemoteRecord>, SyncFailure> {
        let mut retries = 0;
        let mut backoff = self.options.initial_backoff;

        loop {
            let attempt =
                tokio::time::timeout(self.options.fetch_timeout, self.source.fetch_all_poems())
                    .await;

            let failure = match attempt {
                Ok(Ok(records)) => return Ok(records),
                Ok(Err(RemoteError::Timeout(e))) => {
                    warn!(error = %e, "Remote request timed out");
                    return Err(SyncFailure::Timeout);
                }
                Ok(Err(e)) if e.is_transient() => SyncFailure::RemoteUnavailable(e.to_string()),
                Ok(Err(e)) => return Err(SyncFailure::RemoteUnavailable(e.to_string())),
                Err(_) => {
                    warn!(
                        timeout_ms = self.options.fetch_timeout.as_millis() as u64,
                        "Remote fetch timed out"
                    );
                    return Err(SyncFailure::Timeout);
                }
            };

            retries += 1;
            if retries > self.options.max_retries {
                return Err(failure);
            }
            warn!(
                retry = retries,
                backoff_ms = backoff.as_millis() as u64,
                error = %failure,
                "Remote source unavailable, backing off"
            );
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
    }

    /// Insert each record on its own. A failed record is logged and collected;
    /// it never stops the rest of the batch.
    async fn populate(
        store: &StoreHandle,
        records: Vec<RemoteRecord>,
    ) -> (usize, Vec<InsertFailure>) {
        let mut inserted = 0;
        let mut failures = Vec::new();

        for record in records {
            let poem = match record.into_poem() {
                Ok(poem) => poem,
                Err(e) => {
                    warn!(error = %e, "Rejected remote poem");
                    failures.push(InsertFailure {
                        id: None,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let id = poem.id;
            match store.insert_poem(poem).await {
                Ok(()) => inserted += 1,
                Err(e) => {
                    warn!(id, error = %e, "Failed to insert poem");
                    failures.push(InsertFailure {
                        id: Some(id),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (inserted, failures)
    }
}
