//! The poem currently open in the detail view.
//!
//! A `SelectionBroker` belongs to one session. It holds a copy of the chosen
//! poem, so the detail view never re-queries the store and never learns
//! whether the poem still exists there. Last write wins.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::models::Poem;

#[derive(Debug, Default)]
pub struct SelectionBroker {
    current: RwLock<Option<Poem>>,
}

impl SelectionBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection.
    pub fn select(&self, poem: Poem) {
        debug!(id = poem.id, "Poem selected");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(poem);
    }

    /// The selected poem, or `None` when nothing was chosen yet; the detail
    /// view shows its empty state in that case.
    pub fn current(&self) -> Option<Poem> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_before_select_is_none() {
        let broker = SelectionBroker::new();
        assert!(broker.current().is_none());
    }

    #[test]
    fn test_select_round_trip() {
        let broker = SelectionBroker::new();
        let poem = Poem::new(1, "Dawn", "The sky turns grey", Some("A".to_string()));

        broker.select(poem.clone());
        assert_eq!(broker.current(), Some(poem));
    }

    #[test]
    fn test_last_write_wins_and_clear() {
        let broker = SelectionBroker::new();
        broker.select(Poem::new(1, "Dawn", "...", None));
        broker.select(Poem::new(2, "Dusk", "...", None));
        assert_eq!(broker.current().map(|p| p.id), Some(2));

        broker.clear();
        assert!(broker.current().is_none());
    }
}
