//! Core library for versecache.
//!
//! versecache keeps a fixed catalog of poems on-device. The remote table is
//! copied into a local SQLite store once, when the store is empty, and every
//! read afterwards is served from that store through an in-memory snapshot.
//!
//! - `store`: storage session, schema and the shared connection handle
//! - `remote`: the `PoemSource` trait and the Supabase adapter
//! - `sync`: the populate-if-empty `Synchronizer` and its policy
//! - `cache`: read-through snapshot of the local store
//! - `selection`: the currently viewed poem
//! - `session`: the consumer-facing API tying the pieces together

pub mod cache;
pub mod config;
pub mod models;
pub mod remote;
pub mod selection;
pub mod session;
pub mod store;
pub mod sync;
pub mod utils;

pub use cache::{ReadCache, Snapshot};
pub use config::Config;
pub use models::{Category, Poem};
pub use remote::{PoemSource, RemoteError, RemoteRecord, SupabaseSource};
pub use selection::SelectionBroker;
pub use session::{ListState, PoemSession};
pub use store::{StorageSession, StoreError, StoreHandle, StoreLocation};
pub use sync::{
    EmptyStoreSyncPolicy, InsertFailure, SyncDecision, SyncFailure, SyncOptions, SyncPolicy,
    SyncResult, Synchronizer,
};
