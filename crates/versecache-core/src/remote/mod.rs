//! Remote source of the poem catalog.
//!
//! `PoemSource` is the one query the synchronizer needs: fetch every poem.
//! `SupabaseSource` implements it against a Supabase (PostgREST) table whose
//! columns use capitalized names (`Title`, `Body`, `Author`); the adapter
//! normalizes them into `RemoteRecord`s before the synchronizer sees them.

pub mod error;
pub mod record;
pub mod supabase;

use async_trait::async_trait;

pub use error::RemoteError;
pub use record::{RecordError, RemoteRecord};
pub use supabase::SupabaseSource;

#[async_trait]
pub trait PoemSource: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Fetch the full poem collection. No paging, no filtering.
    async fn fetch_all_poems(&self) -> Result<Vec<RemoteRecord>, RemoteError>;
}
