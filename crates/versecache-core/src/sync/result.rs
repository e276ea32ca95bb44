use thiserror::Error;

/// Outcome of one `sync_if_empty` run. Cloned to every caller that joined
/// the same in-flight sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// Remote records were written. `failures` lists records that could not
    /// be stored; the sync still counts as complete for the rest.
    Populated {
        inserted: usize,
        failures: Vec<InsertFailure>,
    },
    /// The policy judged the store already populated; no remote call was made.
    Skipped,
    /// Nothing was written.
    Failed(SyncFailure),
}

impl SyncResult {
    /// Rows written by this sync; zero unless `Populated`.
    pub fn inserted(&self) -> usize {
        match self {
            SyncResult::Populated { inserted, .. } => *inserted,
            _ => 0,
        }
    }

    /// Populated, but some records were not stored.
    pub fn is_partial(&self) -> bool {
        matches!(self, SyncResult::Populated { failures, .. } if !failures.is_empty())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncResult::Failed(_))
    }

    /// One-line summary for status bars and logs.
    pub fn summary(&self) -> String {
        match self {
            SyncResult::Populated { inserted, failures } if failures.is_empty() => {
                format!("Synced {} poems", inserted)
            }
            SyncResult::Populated { inserted, failures } => {
                format!("Synced {} poems ({} failed)", inserted, failures.len())
            }
            SyncResult::Skipped => "Already synced".to_string(),
            SyncResult::Failed(reason) => format!("Sync failed: {}", reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncFailure {
    #[error("timeout")]
    Timeout,

    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// A remote record that did not make it into the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    /// Remote id, when it could be read.
    pub id: Option<i64>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let full = SyncResult::Populated {
            inserted: 2,
            failures: vec![],
        };
        assert_eq!(full.summary(), "Synced 2 poems");
        assert!(!full.is_partial());

        let partial = SyncResult::Populated {
            inserted: 1,
            failures: vec![InsertFailure {
                id: Some(2),
                reason: "duplicate".to_string(),
            }],
        };
        assert_eq!(partial.summary(), "Synced 1 poems (1 failed)");
        assert!(partial.is_partial());

        assert_eq!(SyncResult::Skipped.summary(), "Already synced");
        assert_eq!(
            SyncResult::Failed(SyncFailure::Timeout).summary(),
            "Sync failed: timeout"
        );
    }

    #[test]
    fn test_inserted() {
        assert_eq!(SyncResult::Skipped.inserted(), 0);
        assert_eq!(SyncResult::Failed(SyncFailure::Timeout).inserted(), 0);
        assert!(SyncResult::Failed(SyncFailure::Timeout).is_failed());
    }
}
