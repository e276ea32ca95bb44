use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rusqlite::Connection;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::sync::{SingleFlight, SyncResult};

use super::{schema, StoreError, StoreHandle};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::InMemory => write!(f, ":memory:"),
        }
    }
}

/// Owns the lifetime of the local database for one application session.
///
/// The in-flight initialization is memoized in a `OnceCell`, so concurrent
/// first callers all wait on the same open-and-create-schema step and receive
/// the same handle. A failed initialization leaves the cell empty and the next
/// call tries again.
///
/// The session also owns the single-flight guard for syncs into this store,
/// so independent synchronizers over one session never populate it twice.
pub struct StorageSession {
    location: StoreLocation,
    handle: OnceCell<StoreHandle>,
    initializations: AtomicUsize,
    sync_flight: SingleFlight<SyncResult>,
}

impl StorageSession {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            handle: OnceCell::new(),
            initializations: AtomicUsize::new(0),
            sync_flight: SingleFlight::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreLocation::InMemory)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Open the database on first use, or return the already open handle.
    pub async fn open_or_reuse(&self) -> Result<StoreHandle, StoreError> {
        self.handle
            .get_or_try_init(|| self.initialize())
            .await
            .cloned()
    }

    /// The handle if initialization already succeeded.
    pub fn handle(&self) -> Option<StoreHandle> {
        self.handle.get().cloned()
    }

    /// Number of successful schema initializations performed by this session.
    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }

    pub(crate) fn sync_flight(&self) -> &SingleFlight<SyncResult> {
        &self.sync_flight
    }

    async fn initialize(&self) -> Result<StoreHandle, StoreError> {
        let location = self.location.clone();
        let conn = tokio::task::spawn_blocking(move || open_connection(&location))
            .await
            .map_err(|e| StoreError::Unavailable(format!("storage task failed: {}", e)))?
            .inspect_err(|e| {
                error!(location = %self.location, error = %e, "Failed to open local store")
            })?;

        self.initializations.fetch_add(1, Ordering::SeqCst);
        info!(location = %self.location, "Local store initialized");
        Ok(StoreHandle::new(conn))
    }
}

fn open_connection(location: &StoreLocation) -> Result<Connection, StoreError> {
    let conn = match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!(
                        "failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
            Connection::open(path)
        }
        StoreLocation::InMemory => Connection::open_in_memory(),
    }
    .map_err(|e| StoreError::Unavailable(format!("failed to open {}: {}", location, e)))?;

    schema::initialize(&conn)
        .map_err(|e| StoreError::Unavailable(format!("failed to create schema: {}", e)))?;

    Ok(conn)
}
