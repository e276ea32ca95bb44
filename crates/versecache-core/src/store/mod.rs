//! Local SQLite store for offline access.
//!
//! A `StorageSession` is constructed explicitly and shared by everything that
//! touches the database. Its first `open_or_reuse()` call opens the file and
//! creates the schema; every later call returns the same `StoreHandle`.
//!
//! Tables:
//! - `poems(id, title, body, author)`
//! - `categories(id, name, description)`

pub mod error;
pub mod handle;
pub mod schema;
pub mod session;

pub use error::StoreError;
pub use handle::StoreHandle;
pub use session::{StorageSession, StoreLocation};
