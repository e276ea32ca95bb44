use serde::{Deserialize, Serialize};

/// Row of the `categories` table. Nothing reads or writes categories yet; the
/// table exists so later catalog structure does not need a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}
