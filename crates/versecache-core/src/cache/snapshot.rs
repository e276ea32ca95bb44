use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::Poem;

/// Poems as they were in the local store at `loaded_at`.
/// Clone is cheap - the poem list is shared.
#[derive(Debug, Clone)]
pub struct Snapshot {
    poems: Arc<[Poem]>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    /// The state before anything was loaded.
    pub fn empty() -> Self {
        Self {
            poems: Arc::from(Vec::new()),
            loaded_at: None,
        }
    }

    pub fn new(poems: Vec<Poem>) -> Self {
        Self {
            poems: Arc::from(poems),
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn poems(&self) -> &[Poem] {
        &self.poems
    }

    pub fn len(&self) -> usize {
        self.poems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poems.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn find(&self, id: i64) -> Option<&Poem> {
        self.poems.iter().find(|poem| poem.id == id)
    }

    pub fn age_minutes(&self) -> Option<i64> {
        self.loaded_at.map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        let minutes = match self.age_minutes() {
            Some(minutes) => minutes,
            None => return "never".to_string(),
        };

        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}
