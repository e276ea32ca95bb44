//! Read-through cache over the local store.
//!
//! `ReadCache` loads every poem into an immutable `Snapshot` and publishes it
//! to subscribers. It never writes to the store and never triggers a sync;
//! callers decide when to `reload()`.

pub mod read_cache;
pub mod snapshot;

pub use read_cache::ReadCache;
pub use snapshot::Snapshot;
