use super::entry::{Entry, EntryId, EntryKind};

/// Priority sentinel for results that have not been scored yet.
pub const UNSCORED: i32 = -1;

/// A corpus entry paired with the rank a session assigned to it.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub entry: Entry,
    /// Higher is better; [`UNSCORED`] until a strategy has run.
    pub priority: i32,
}

impl ScoredResult {
    #[must_use]
    pub fn unscored(entry: Entry) -> Self {
        Self {
            entry,
            priority: UNSCORED,
        }
    }

    /// Logical identity of the underlying item.
    ///
    /// Two results refer to the same item iff kind, path, and id all match;
    /// the priority is a per-session artifact and takes no part in identity.
    #[must_use]
    pub fn key(&self) -> ResultKey<'_> {
        ResultKey {
            kind: self.entry.kind,
            path: &self.entry.path,
            id: self.entry.id,
        }
    }

    #[must_use]
    pub fn is_same_item(&self, other: &ScoredResult) -> bool {
        self.key() == other.key()
    }
}

/// Identity triple used for history deduplication and selection tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultKey<'a> {
    pub kind: EntryKind,
    pub path: &'a str,
    pub id: EntryId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_priority() {
        let a = ScoredResult {
            entry: Entry::path_entry(EntryId(1), "a/b.rs", true),
            priority: 10,
        };
        let b = ScoredResult {
            entry: Entry::path_entry(EntryId(1), "a/b.rs", true),
            priority: 99,
        };
        assert!(a.is_same_item(&b));
    }

    #[test]
    fn identity_distinguishes_kind_path_and_id() {
        let path = ScoredResult::unscored(Entry::path_entry(EntryId(1), "a/b.rs", true));
        let command = ScoredResult::unscored(Entry::command("a/b.rs", true));
        assert!(!path.is_same_item(&command));

        let other_path = ScoredResult::unscored(Entry::path_entry(EntryId(1), "a/c.rs", true));
        assert!(!path.is_same_item(&other_path));
    }
}
