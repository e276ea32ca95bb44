//! Remote-to-local synchronization.
//!
//! The local store is populated from the remote source only when a
//! `SyncPolicy` says so. The default `EmptyStoreSyncPolicy` trusts that a
//! non-empty store was already synced, so there is no diffing and no
//! timestamp comparison.
//!
//! At most one sync runs per `StorageSession`: concurrent callers share the
//! in-flight run and all receive its `SyncResult`, even when they go through
//! different `Synchronizer`s.

pub mod flight;
pub mod policy;
pub mod result;
pub mod synchronizer;

pub use flight::SingleFlight;
pub use policy::{EmptyStoreSyncPolicy, SyncDecision, SyncPolicy};
pub use result::{InsertFailure, SyncFailure, SyncResult};
pub use synchronizer::{SyncOptions, Synchronizer};
