//! Data models for the poem catalog.
//!
//! - `Poem`: a single catalog entry, mirrored 1:1 in the `poems` table
//! - `Category`: schema placeholder for future catalog structure

pub mod category;
pub mod poem;

pub use category::Category;
pub use poem::Poem;
