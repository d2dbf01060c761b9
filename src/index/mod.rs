//! Incrementally maintained index over the corpus.
//!
//! The index is built lazily from one full provider enumeration and then
//! patched in place by add/remove/move deltas. Readers take an immutable
//! [`IndexSnapshot`] for the duration of a session; writers build a new
//! snapshot and swap it in, so a delta applied between sessions is never
//! visible mid-session.

mod filesystem;

pub use filesystem::{FilesystemCorpus, WalkOptions};

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Result, SearchError};
use crate::filter::chars_equal;
use crate::identity::stable_entry_id;
use crate::providers::CorpusProvider;
use crate::types::EntryId;

/// Incremental add/remove/move notification from the corpus provider.
#[derive(Debug, Clone, Default)]
pub struct CorpusDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub moved: Vec<(String, String)>,
}

impl CorpusDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }
}

/// Immutable view of the index at one point in time.
///
/// The id set of the index is exactly this map's key set, so the two can
/// never disagree.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    paths: HashMap<EntryId, String>,
}

impl IndexSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path mapped to `id`, or `None` for identifiers the index has never
    /// seen or has since dropped.
    #[must_use]
    pub fn path_of(&self, id: EntryId) -> Option<&str> {
        self.paths.get(&id).map(String::as_str)
    }

    /// All identifiers under `scope`; the empty scope means the index root.
    ///
    /// Scope comparison is a case-insensitive path prefix. Results come back
    /// in path order so downstream ranking ties stay deterministic.
    #[must_use]
    pub fn lookup(&self, scope: &str) -> Vec<EntryId> {
        let mut matches: Vec<(&String, EntryId)> = self
            .paths
            .iter()
            .filter(|(_, path)| scope.is_empty() || starts_with_fold(path.as_str(), scope))
            .map(|(id, path)| (path, *id))
            .collect();
        matches.sort();
        matches.into_iter().map(|(_, id)| id).collect()
    }
}

/// The mutable index handle shared by sessions and the delta feed.
#[derive(Debug, Default)]
pub struct CorpusIndex {
    state: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl CorpusIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.read_state().is_some()
    }

    /// Drop the built state so the next use triggers a fresh enumeration.
    pub fn invalidate(&self) {
        *self.write_state() = None;
    }

    /// Build the index from a full enumeration. No-op when already built.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Unavailable`] when the provider cannot
    /// enumerate the corpus; the index stays unbuilt and a later call may
    /// retry.
    pub fn rebuild(&self, provider: &dyn CorpusProvider) -> Result<()> {
        let mut guard = self.write_state();
        if guard.is_some() {
            return Ok(());
        }

        let paths = provider
            .enumerate()
            .map_err(|err| SearchError::Unavailable(err.to_string()))?;

        let mut mapped: HashMap<EntryId, String> = HashMap::with_capacity(paths.len());
        for path in paths {
            let normalized = normalize_path(&path);
            mapped.insert(stable_entry_id(&normalized), normalized);
        }

        log::debug!("corpus index built with {} entries", mapped.len());
        *guard = Some(Arc::new(IndexSnapshot { paths: mapped }));
        Ok(())
    }

    /// Patch the built index with an incremental delta.
    ///
    /// An unbuilt index defers to [`CorpusIndex::rebuild`]. Added and moved
    /// destinations are upserts; removals delete every identifier whose
    /// current path equals the removed one, compared case-insensitively.
    /// Repeated or unknown notifications are tolerated no-ops.
    ///
    /// # Errors
    ///
    /// Only the rebuild fallback can fail, with the same meaning as
    /// [`CorpusIndex::rebuild`].
    pub fn apply_delta(&self, provider: &dyn CorpusProvider, delta: &CorpusDelta) -> Result<()> {
        {
            let guard = self.read_state();
            if guard.is_none() {
                drop(guard);
                return self.rebuild(provider);
            }
        }
        if delta.is_empty() {
            return Ok(());
        }

        let mut guard = self.write_state();
        let Some(current) = guard.as_ref() else {
            // Invalidated while we waited for the lock; the next lookup rebuilds.
            return Ok(());
        };
        let mut paths = current.paths.clone();

        for path in &delta.added {
            upsert(&mut paths, path);
        }
        for (from, to) in &delta.moved {
            match find_id_by_path(&paths, &normalize_path(from)) {
                Some(id) => {
                    paths.insert(id, normalize_path(to));
                }
                // Unknown source: degrade to a plain add of the destination.
                None => upsert(&mut paths, to),
            }
        }
        for removed in &delta.removed {
            let target = normalize_path(removed);
            paths.retain(|_, path| !eq_fold(path, &target));
        }

        log::debug!(
            "corpus delta applied: +{} -{} moved {} ({} entries)",
            delta.added.len(),
            delta.removed.len(),
            delta.moved.len(),
            paths.len()
        );
        *guard = Some(Arc::new(IndexSnapshot { paths }));
        Ok(())
    }

    /// Snapshot for one session, building the index first if necessary.
    ///
    /// # Errors
    ///
    /// Fails only when a required rebuild fails.
    pub fn snapshot(&self, provider: &dyn CorpusProvider) -> Result<Arc<IndexSnapshot>> {
        if let Some(snapshot) = self.read_state().as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        self.rebuild(provider)?;
        match self.read_state().as_ref() {
            Some(snapshot) => Ok(Arc::clone(snapshot)),
            None => Err(SearchError::Unavailable(
                "index invalidated during rebuild".to_string(),
            )),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Option<Arc<IndexSnapshot>>> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Option<Arc<IndexSnapshot>>> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Insert `path`, reusing the identifier of any case-insensitively equal
/// existing path so duplicate notifications cannot grow the index.
fn upsert(paths: &mut HashMap<EntryId, String>, path: &str) {
    let normalized = normalize_path(path);
    match find_id_by_path(paths, &normalized) {
        Some(id) => {
            paths.insert(id, normalized);
        }
        None => {
            paths.insert(stable_entry_id(&normalized), normalized);
        }
    }
}

fn find_id_by_path(paths: &HashMap<EntryId, String>, target: &str) -> Option<EntryId> {
    paths
        .iter()
        .find(|(_, path)| eq_fold(path.as_str(), target))
        .map(|(id, _)| *id)
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn starts_with_fold(value: &str, prefix: &str) -> bool {
    let mut value_chars = value.chars();
    for expected in prefix.chars() {
        match value_chars.next() {
            Some(actual) if chars_equal(actual, expected, true) => {}
            _ => return false,
        }
    }
    true
}

fn eq_fold(a: &str, b: &str) -> bool {
    starts_with_fold(a, b) && a.chars().count() == b.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::StaticCorpus;

    fn corpus() -> StaticCorpus {
        StaticCorpus::new(["Assets/Foo/Player.cs", "Assets/Bar/Enemy.cs"])
    }

    fn paths_of(snapshot: &IndexSnapshot, scope: &str) -> Vec<String> {
        snapshot
            .lookup(scope)
            .into_iter()
            .filter_map(|id| snapshot.path_of(id).map(str::to_string))
            .collect()
    }

    #[test]
    fn rebuild_is_idempotent() {
        let index = CorpusIndex::new();
        let provider = corpus();
        index.rebuild(&provider).expect("rebuild");
        index.rebuild(&provider).expect("second rebuild");
        let snapshot = index.snapshot(&provider).expect("snapshot");
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn rebuild_deduplicates_identifiers() {
        let index = CorpusIndex::new();
        let provider = StaticCorpus::new(["a/b.rs", "a/b.rs", "a/c.rs"]);
        index.rebuild(&provider).expect("rebuild");
        assert_eq!(index.snapshot(&provider).expect("snapshot").len(), 2);
    }

    #[test]
    fn lookup_scopes_by_case_insensitive_prefix() {
        let index = CorpusIndex::new();
        let provider = corpus();
        let snapshot = index.snapshot(&provider).expect("snapshot");

        assert_eq!(snapshot.lookup("").len(), 2);
        assert_eq!(paths_of(&snapshot, "assets/foo"), ["Assets/Foo/Player.cs"]);
        assert!(snapshot.lookup("Assets/Missing").is_empty());
    }

    #[test]
    fn invalidate_forces_a_fresh_enumeration() {
        let index = CorpusIndex::new();
        index.rebuild(&corpus()).expect("rebuild");

        index.invalidate();
        assert!(!index.is_built());

        let wider = StaticCorpus::new(["a.rs", "b.rs", "c.rs"]);
        let snapshot = index.snapshot(&wider).expect("snapshot");
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn delta_on_unbuilt_index_defers_to_rebuild() {
        let index = CorpusIndex::new();
        let provider = corpus();
        index
            .apply_delta(&provider, &CorpusDelta::default())
            .expect("delta");
        assert!(index.is_built());
    }

    #[test]
    fn removed_paths_disappear_from_root_lookup() {
        let index = CorpusIndex::new();
        let provider = corpus();
        index.rebuild(&provider).expect("rebuild");

        let delta = CorpusDelta {
            removed: vec!["assets/foo/player.cs".to_string()],
            ..CorpusDelta::default()
        };
        index.apply_delta(&provider, &delta).expect("delta");

        let snapshot = index.snapshot(&provider).expect("snapshot");
        assert_eq!(paths_of(&snapshot, ""), ["Assets/Bar/Enemy.cs"]);
    }

    #[test]
    fn moves_keep_the_identifier_stable() {
        let index = CorpusIndex::new();
        let provider = corpus();
        index.rebuild(&provider).expect("rebuild");

        let before = index.snapshot(&provider).expect("snapshot");
        let id = before.lookup("Assets/Foo")[0];

        let delta = CorpusDelta {
            moved: vec![(
                "Assets/Foo/Player.cs".to_string(),
                "Assets/Heroes/Player.cs".to_string(),
            )],
            ..CorpusDelta::default()
        };
        index.apply_delta(&provider, &delta).expect("delta");

        let after = index.snapshot(&provider).expect("snapshot");
        assert_eq!(after.path_of(id), Some("Assets/Heroes/Player.cs"));
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn duplicate_adds_do_not_grow_the_index() {
        let index = CorpusIndex::new();
        let provider = corpus();
        index.rebuild(&provider).expect("rebuild");

        let delta = CorpusDelta {
            added: vec![
                "Assets/Foo/Player.cs".to_string(),
                "ASSETS/FOO/PLAYER.CS".to_string(),
            ],
            ..CorpusDelta::default()
        };
        index.apply_delta(&provider, &delta).expect("delta");
        assert_eq!(index.snapshot(&provider).expect("snapshot").len(), 2);
    }

    #[test]
    fn unknown_removals_are_no_ops() {
        let index = CorpusIndex::new();
        let provider = corpus();
        index.rebuild(&provider).expect("rebuild");

        let delta = CorpusDelta {
            removed: vec!["Assets/Nope.cs".to_string()],
            ..CorpusDelta::default()
        };
        index.apply_delta(&provider, &delta).expect("delta");
        assert_eq!(index.snapshot(&provider).expect("snapshot").len(), 2);
    }

    #[test]
    fn snapshots_are_isolated_from_later_deltas() {
        let index = CorpusIndex::new();
        let provider = corpus();
        let before = index.snapshot(&provider).expect("snapshot");

        let delta = CorpusDelta {
            added: vec!["Assets/New/Thing.png".to_string()],
            ..CorpusDelta::default()
        };
        index.apply_delta(&provider, &delta).expect("delta");

        assert_eq!(before.len(), 2);
        assert_eq!(index.snapshot(&provider).expect("snapshot").len(), 3);
    }

    #[test]
    fn backslashes_normalize_to_forward_slashes() {
        let index = CorpusIndex::new();
        let provider = StaticCorpus::new([r"Assets\Sub\file.txt"]);
        let snapshot = index.snapshot(&provider).expect("snapshot");
        assert_eq!(paths_of(&snapshot, "Assets/Sub"), ["Assets/Sub/file.txt"]);
    }

    #[test]
    fn unavailable_provider_reports_and_allows_retry() {
        struct Failing;
        impl crate::providers::CorpusProvider for Failing {
            fn enumerate(&self) -> anyhow::Result<Vec<String>> {
                anyhow::bail!("source offline")
            }
        }

        let index = CorpusIndex::new();
        let err = index.snapshot(&Failing).expect_err("should fail");
        assert!(matches!(err, SearchError::Unavailable(_)));
        assert!(!index.is_built());

        // A working provider can still build the same index afterwards.
        index.rebuild(&corpus()).expect("rebuild");
        assert!(index.is_built());
    }
}
