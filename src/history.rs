//! Most-recently-used list of executed results.

use crate::types::ScoredResult;

/// Bounded-for-display history of executed results, most recent first.
///
/// The list itself is unbounded; consumers render at most the first
/// [`crate::session::RESULT_CAP`] entries. No logical item ever appears
/// twice: re-adding removes the old occurrence and re-inserts at the front.
#[derive(Debug, Default)]
pub struct HistoryList {
    entries: Vec<ScoredResult>,
}

impl HistoryList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove any logical duplicate of `result`, then prepend it.
    pub fn add_or_promote(&mut self, result: ScoredResult) {
        self.entries.retain(|existing| !existing.is_same_item(&result));
        self.entries.insert(0, result);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredResult> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScoredResult] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
