use serde::{Deserialize, Serialize};

/// Label shown when a poem has no author on record.
const UNKNOWN_AUTHOR: &str = "Anonymous";

/// A poem as stored locally. `id` is the primary key shared with the remote
/// table, so a local row and its remote record always carry the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author: Option<String>,
}

impl Poem {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
        author: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            author,
        }
    }

    /// Author name for display, falling back to a placeholder.
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    /// First non-blank line of the body, used as a list-row preview.
    pub fn first_line(&self) -> &str {
        self.body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}
