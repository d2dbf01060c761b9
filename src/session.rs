//! One search session: parse, filter, score, rank, deliver.
//!
//! A session runs the pipeline for a single query over a single category.
//! Filtering and scoring are pure per candidate and fan out across cores;
//! the cancellation token is polled at every phase boundary so a superseded
//! session aborts without touching visible state.

use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::filter::{chars_equal, is_subsequence};
use crate::history::HistoryList;
use crate::index::IndexSnapshot;
use crate::providers::{CommandProvider, LiveObjectProvider};
use crate::query::Query;
use crate::score::ScoreStrategy;
use crate::types::{Entry, EntryId, ScoredResult, file_stem};

/// Most results delivered to the consumer per session; the total survivor
/// count is reported separately.
pub const RESULT_CAP: usize = 50;

/// Keywords shorter than this short-circuit to an empty outcome on every
/// category except history.
pub const MIN_KEYWORD_LEN: usize = 2;

/// Result categories a session can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchCategory {
    /// Hierarchical corpus entries resolved through the index.
    #[default]
    Paths,
    /// Named commands from the command provider.
    Commands,
    /// Live objects matched by name.
    Objects,
    /// Live objects matched by their extracted text.
    ObjectText,
    /// Previously executed results.
    History,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 5] = [
        SearchCategory::Paths,
        SearchCategory::Commands,
        SearchCategory::Objects,
        SearchCategory::ObjectText,
        SearchCategory::History,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paths => "paths",
            Self::Commands => "commands",
            Self::Objects => "objects",
            Self::ObjectText => "object-text",
            Self::History => "history",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }

    /// Neighbouring category for tab cycling; wraps at both ends.
    #[must_use]
    pub fn cycled(self, direction: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let index = Self::ALL
            .iter()
            .position(|category| *category == self)
            .unwrap_or_default() as i32;
        Self::ALL[(index + direction).rem_euclid(len) as usize]
    }
}

/// What a completed session hands to the consumer.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Number of candidates that survived filtering, before truncation.
    pub total_count: usize,
    /// Ranked results, at most [`RESULT_CAP`].
    pub delivered: Vec<ScoredResult>,
    /// Cursor into `delivered`; `-1` when there is nothing to select.
    pub active_index: i32,
    /// Set when the corpus provider could not be enumerated at all.
    pub index_unavailable: bool,
}

impl Default for SearchOutcome {
    fn default() -> Self {
        Self::empty()
    }
}

impl SearchOutcome {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            delivered: Vec::new(),
            active_index: -1,
            index_unavailable: false,
        }
    }

    #[must_use]
    pub(crate) fn unavailable() -> Self {
        Self {
            index_unavailable: true,
            ..Self::empty()
        }
    }

    fn delivered(total_count: usize, delivered: Vec<ScoredResult>) -> Self {
        let active_index = if delivered.is_empty() { -1 } else { 0 };
        Self {
            total_count,
            delivered,
            active_index,
            index_unavailable: false,
        }
    }
}

/// A single parse→filter→score→rank cycle.
pub(crate) struct SearchSession<'a> {
    query: Query,
    strategy: ScoreStrategy,
    token: &'a CancelToken,
}

impl<'a> SearchSession<'a> {
    pub(crate) fn new(raw: &str, strategy: ScoreStrategy, token: &'a CancelToken) -> Self {
        Self {
            query: Query::parse(raw),
            strategy,
            token,
        }
    }

    pub(crate) fn query(&self) -> &Query {
        &self.query
    }

    /// Search path entries under the parsed scope. `None` means cancelled.
    pub(crate) fn run_paths(&self, snapshot: &IndexSnapshot) -> Option<SearchOutcome> {
        if self.below_minimum() {
            return Some(SearchOutcome::empty());
        }

        let candidates = snapshot.lookup(&self.query.scope);
        let survivors: Vec<Entry> = candidates
            .into_par_iter()
            .filter_map(|id| self.admit_path(snapshot, id))
            .collect();
        self.checkpoint()?;

        let scored = self.score_entries(survivors, &self.query.file_keyword);
        self.checkpoint()?;

        Some(rank(scored))
    }

    /// Search the command provider's flat list.
    pub(crate) fn run_commands(&self, provider: &dyn CommandProvider) -> Option<SearchOutcome> {
        if self.below_minimum() {
            return Some(SearchOutcome::empty());
        }
        let entries = provider
            .commands()
            .into_iter()
            .map(|name| Entry::command(name, self.query.ignore_case))
            .collect();
        self.run_named(entries)
    }

    /// Search live objects by name.
    pub(crate) fn run_objects(&self, provider: &dyn LiveObjectProvider) -> Option<SearchOutcome> {
        if self.below_minimum() {
            return Some(SearchOutcome::empty());
        }
        let entries = provider
            .objects()
            .into_iter()
            .map(|object| Entry::live_object(object.id, object.name, self.query.ignore_case))
            .collect();
        self.run_named(entries)
    }

    /// Search live objects by their extracted text blobs.
    pub(crate) fn run_object_text(
        &self,
        provider: &dyn LiveObjectProvider,
    ) -> Option<SearchOutcome> {
        if self.below_minimum() {
            return Some(SearchOutcome::empty());
        }
        let entries = provider
            .objects()
            .into_iter()
            .map(|object| {
                let text = provider.extracted_text(&object);
                Entry::text_match(object.id, object.name, text, self.query.ignore_case)
            })
            .collect();
        self.run_named(entries)
    }

    /// Filter the history list, preserving its most-recent-first order.
    ///
    /// History is exempt from the minimum-keyword guard and is never
    /// re-ranked: recency is its ranking.
    pub(crate) fn run_history(&self, history: &HistoryList) -> SearchOutcome {
        let matches: Vec<ScoredResult> = history
            .iter()
            .filter(|result| self.admits_named(&result.entry))
            .cloned()
            .collect();
        let total_count = matches.len();
        let mut delivered = matches;
        delivered.truncate(RESULT_CAP);
        SearchOutcome::delivered(total_count, delivered)
    }

    fn run_named(&self, entries: Vec<Entry>) -> Option<SearchOutcome> {
        let survivors: Vec<Entry> = entries
            .into_par_iter()
            .filter(|entry| self.admits_named(entry))
            .collect();
        self.checkpoint()?;

        let scored = self.score_entries(survivors, &self.query.keyword_stem);
        self.checkpoint()?;

        Some(rank(scored))
    }

    /// Gate one indexed path: directory tokens, stem subsequence, extension.
    fn admit_path(&self, snapshot: &IndexSnapshot, id: EntryId) -> Option<Entry> {
        let path = snapshot.path_of(id)?;
        let ignore_case = self.query.ignore_case;
        let (directory, name) = split_path(path);

        for keyword in &self.query.directory_keywords {
            if !is_subsequence(directory, keyword, ignore_case) {
                return None;
            }
        }
        if !is_subsequence(file_stem(name), &self.query.keyword_stem, ignore_case) {
            return None;
        }
        if !self.extension_matches(name) {
            return None;
        }

        Some(Entry::path_entry(id, path, ignore_case))
    }

    /// Gate used by every non-path category and by history filtering.
    fn admits_named(&self, entry: &Entry) -> bool {
        is_subsequence(
            &entry.display_name,
            &self.query.keyword_stem,
            self.query.ignore_case,
        ) && self.extension_matches(&entry.display_name_with_extension)
    }

    fn extension_matches(&self, name_with_extension: &str) -> bool {
        if !self.query.has_extension() {
            return true;
        }
        ends_with_fold(
            name_with_extension,
            &self.query.keyword_extension,
            self.query.ignore_case,
        )
    }

    fn score_entries(&self, survivors: Vec<Entry>, keyword: &str) -> Vec<ScoredResult> {
        survivors
            .into_par_iter()
            .map(|entry| {
                let priority =
                    self.strategy
                        .score(&entry.display_name, keyword, self.query.ignore_case);
                ScoredResult { entry, priority }
            })
            .collect()
    }

    fn below_minimum(&self) -> bool {
        self.query.keyword_len() < MIN_KEYWORD_LEN
    }

    fn checkpoint(&self) -> Option<()> {
        if self.token.is_cancelled() { None } else { Some(()) }
    }
}

/// Stable sort descending by priority, then truncate for delivery.
fn rank(mut scored: Vec<ScoredResult>) -> SearchOutcome {
    scored.sort_by(|a, b| b.priority.cmp(&a.priority));
    let total_count = scored.len();
    scored.truncate(RESULT_CAP);
    SearchOutcome::delivered(total_count, scored)
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    }
}

/// Suffix test honouring the session's case rule.
fn ends_with_fold(value: &str, suffix: &str, ignore_case: bool) -> bool {
    if !ignore_case {
        return value.ends_with(suffix);
    }
    let value: Vec<char> = value.chars().collect();
    let suffix: Vec<char> = suffix.chars().collect();
    if suffix.len() > value.len() {
        return false;
    }
    value[value.len() - suffix.len()..]
        .iter()
        .zip(suffix.iter())
        .all(|(&v, &s)| chars_equal(v, s, true))
}
