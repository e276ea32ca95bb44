//! Session state for one reader.
//!
//! `PoemSession` is the only surface the UI calls into: get all cached poems,
//! get or set the current selection, trigger sync-if-empty and force a reload.
//! It owns the read cache and selection broker and shares the storage session
//! with its synchronizer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::cache::{ReadCache, Snapshot};
use crate::models::Poem;
use crate::remote::PoemSource;
use crate::selection::SelectionBroker;
use crate::store::{StorageSession, StoreError};
use crate::sync::{SyncOptions, SyncResult, Synchronizer};

/// What the list view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// `start()` has not finished yet.
    Loading,
    /// The local store could not be opened; offline with no data.
    Unavailable,
    /// Loaded, but there is nothing to show (first run, failed sync or an
    /// empty remote).
    Empty,
    Ready(usize),
}

pub struct PoemSession {
    storage: Arc<StorageSession>,
    synchronizer: Synchronizer,
    cache: ReadCache,
    selection: SelectionBroker,
    loading: AtomicBool,
    unavailable: AtomicBool,
    last_sync: Mutex<Option<SyncResult>>,
}

impl PoemSession {
    pub fn new(
        storage: Arc<StorageSession>,
        source: Arc<dyn PoemSource>,
        options: SyncOptions,
    ) -> Self {
        let synchronizer = Synchronizer::new(Arc::clone(&storage), source, options);
        Self::with_synchronizer(storage, synchronizer)
    }

    pub fn with_synchronizer(storage: Arc<StorageSession>, synchronizer: Synchronizer) -> Self {
        Self {
            cache: ReadCache::new(Arc::clone(&storage)),
            storage,
            synchronizer,
            selection: SelectionBroker::new(),
            loading: AtomicBool::new(true),
            unavailable: AtomicBool::new(false),
            last_sync: Mutex::new(None),
        }
    }

    /// Open the local store and load the first snapshot. A storage failure is
    /// returned to the caller and leaves the session in `Unavailable`.
    pub async fn start(&self) -> Result<Snapshot, StoreError> {
        let result = match self.storage.open_or_reuse().await {
            Ok(_) => self.cache.reload().await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(snapshot) => {
                info!(count = snapshot.len(), "Session started from local cache");
                self.unavailable.store(false, Ordering::SeqCst);
            }
            Err(e) => {
                error!(error = %e, "Session start failed, no cached data available");
                self.unavailable.store(true, Ordering::SeqCst);
            }
        }
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    /// All cached poems as of the last load.
    pub fn poems(&self) -> Snapshot {
        self.cache.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.cache.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn list_state(&self) -> ListState {
        if self.is_loading() {
            return ListState::Loading;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return ListState::Unavailable;
        }
        match self.cache.snapshot().len() {
            0 => ListState::Empty,
            n => ListState::Ready(n),
        }
    }

    pub async fn sync_if_empty(&self) -> SyncResult {
        let result = self.synchronizer.sync_if_empty().await;
        *self.last_sync.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        result
    }

    /// Result of the most recent sync triggered through this session.
    pub fn last_sync(&self) -> Option<SyncResult> {
        self.last_sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the local store into a new snapshot.
    pub async fn reload(&self) -> Result<Snapshot, StoreError> {
        let snapshot = self.cache.reload().await?;
        self.unavailable.store(false, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
        Ok(snapshot)
    }

    /// Sync if the store is empty, then reload whatever the store holds.
    /// A failed sync is not an error here; the reload still runs.
    pub async fn sync_and_reload(&self) -> Result<(SyncResult, Snapshot), StoreError> {
        let result = self.sync_if_empty().await;
        if result.is_failed() {
            warn!(summary = %result.summary(), "Sync did not complete, showing cached data");
        }
        let snapshot = self.reload().await?;
        Ok((result, snapshot))
    }

    pub fn select(&self, poem: Poem) {
        self.selection.select(poem);
    }

    /// Select a poem by id from the current snapshot, as a detail route
    /// carrying only the id would. Returns `None` and leaves the selection
    /// unchanged when the id is not in the snapshot.
    pub fn select_by_id(&self, id: i64) -> Option<Poem> {
        let poem = self.cache.snapshot().find(id).cloned()?;
        self.selection.select(poem.clone());
        Some(poem)
    }

    pub fn current_selection(&self) -> Option<Poem> {
        self.selection.current()
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }
}
