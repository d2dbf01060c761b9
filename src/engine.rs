//! Engine facade and host-owned session state.
//!
//! [`SearchEngine`] bundles the providers, the index, and the active scoring
//! strategy behind one cancelable `search` call. [`SessionState`] is the
//! explicit per-host-loop state that the original design kept in a global
//! singleton: query text, active category, history, and the latest delivered
//! outcome, all owned by whatever drives the UI loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::history::HistoryList;
use crate::index::{CorpusDelta, CorpusIndex};
use crate::providers::{CommandProvider, CorpusProvider, LiveObjectProvider};
use crate::score::ScoreStrategy;
use crate::session::{SearchCategory, SearchOutcome, SearchSession};
use crate::types::ScoredResult;
use crate::worker::{self, SearchCommand, SearchUpdate};

/// The search core: providers, index, and strategy behind one entry point.
pub struct SearchEngine {
    corpus: Box<dyn CorpusProvider>,
    commands: Option<Box<dyn CommandProvider>>,
    objects: Option<Box<dyn LiveObjectProvider>>,
    index: CorpusIndex,
    strategy: ScoreStrategy,
}

impl SearchEngine {
    #[must_use]
    pub fn new(corpus: impl CorpusProvider + 'static) -> Self {
        Self {
            corpus: Box::new(corpus),
            commands: None,
            objects: None,
            index: CorpusIndex::new(),
            strategy: ScoreStrategy::default(),
        }
    }

    /// Attach a command provider for the commands category.
    #[must_use]
    pub fn with_commands(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.commands = Some(Box::new(provider));
        self
    }

    /// Attach a live-object provider for the object categories.
    #[must_use]
    pub fn with_objects(mut self, provider: impl LiveObjectProvider + 'static) -> Self {
        self.objects = Some(Box::new(provider));
        self
    }

    /// Select the ranking strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ScoreStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn strategy(&self) -> ScoreStrategy {
        self.strategy
    }

    /// The engine's index, exposed so hosts can invalidate or pre-build it.
    #[must_use]
    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    /// Feed a provider delta into the index.
    ///
    /// # Errors
    ///
    /// Fails only when the delta arrives before the first build and the
    /// resulting rebuild cannot enumerate the corpus.
    pub fn apply_delta(&self, delta: &CorpusDelta) -> Result<()> {
        self.index.apply_delta(&*self.corpus, delta)
    }

    /// Run one search session. Returns `None` when the token is raised
    /// mid-flight; a cancelled session leaves no visible trace.
    ///
    /// The history category is answered by [`SearchEngine::search_history`]
    /// on the thread that owns the list; asking for it here yields an empty
    /// outcome.
    #[must_use]
    pub fn search(
        &self,
        raw: &str,
        category: SearchCategory,
        token: &CancelToken,
    ) -> Option<SearchOutcome> {
        let session = SearchSession::new(raw, self.strategy, token);
        log::debug!(
            "session {} on {}: scope '{}' keyword '{}'",
            token.id(),
            category.as_str(),
            session.query().scope,
            session.query().keyword
        );
        if token.is_cancelled() {
            return None;
        }

        match category {
            SearchCategory::Paths => {
                let snapshot = match self.index.snapshot(&*self.corpus) {
                    Ok(snapshot) => snapshot,
                    Err(err) => {
                        log::warn!("corpus index unavailable: {err}");
                        return Some(SearchOutcome::unavailable());
                    }
                };
                session.run_paths(&snapshot)
            }
            SearchCategory::Commands => match self.commands.as_deref() {
                Some(provider) => session.run_commands(provider),
                None => Some(SearchOutcome::empty()),
            },
            SearchCategory::Objects => match self.objects.as_deref() {
                Some(provider) => session.run_objects(provider),
                None => Some(SearchOutcome::empty()),
            },
            SearchCategory::ObjectText => match self.objects.as_deref() {
                Some(provider) => session.run_object_text(provider),
                None => Some(SearchOutcome::empty()),
            },
            SearchCategory::History => Some(SearchOutcome::empty()),
        }
    }

    /// Filter the history list for the history category.
    #[must_use]
    pub fn search_history(&self, history: &HistoryList, raw: &str) -> SearchOutcome {
        let token = CancelToken::detached();
        SearchSession::new(raw, self.strategy, &token).run_history(history)
    }
}

/// Host-owned state for one interactive search loop.
pub struct SessionState {
    engine: Arc<SearchEngine>,
    command_tx: Sender<SearchCommand>,
    update_rx: Receiver<SearchUpdate>,
    latest_query_id: Arc<AtomicU64>,
    next_query_id: u64,
    query_text: String,
    category: SearchCategory,
    history: HistoryList,
    outcome: SearchOutcome,
}

impl SessionState {
    /// Wrap an engine and spawn its background search worker.
    #[must_use]
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        let (command_tx, update_rx, latest_query_id) = worker::spawn(Arc::clone(&engine));
        Self {
            engine,
            command_tx,
            update_rx,
            latest_query_id,
            next_query_id: 0,
            query_text: String::new(),
            category: SearchCategory::default(),
            history: HistoryList::new(),
            outcome: SearchOutcome::empty(),
        }
    }

    #[must_use]
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    #[must_use]
    pub fn category(&self) -> SearchCategory {
        self.category
    }

    #[must_use]
    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    /// Replace the query text, kicking off a new session when it changed.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.query_text {
            self.query_text = text;
            self.request_search();
        }
    }

    /// Switch category by `direction` steps (tab cycling) and re-search.
    pub fn cycle_category(&mut self, direction: i32) {
        self.set_category(self.category.cycled(direction));
    }

    pub fn set_category(&mut self, category: SearchCategory) {
        self.category = category;
        self.request_search();
    }

    /// Start a new session for the current text and category.
    ///
    /// Publishing the fresh query id is what cancels any in-flight session;
    /// history searches resolve synchronously because the list lives here,
    /// on the control thread.
    pub fn request_search(&mut self) {
        self.next_query_id = self.next_query_id.saturating_add(1);
        let id = self.next_query_id;
        self.latest_query_id.store(id, Ordering::Release);

        if self.category == SearchCategory::History {
            self.outcome = self.engine.search_history(&self.history, &self.query_text);
            return;
        }

        let _ = self.command_tx.send(SearchCommand::Query {
            id,
            text: self.query_text.clone(),
            category: self.category,
        });
    }

    /// Drain finished sessions, keeping only the most recent one's outcome.
    pub fn pump(&mut self) {
        loop {
            match self.update_rx.try_recv() {
                Ok(update) => self.apply_update(update),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Forward a corpus delta to the worker between sessions.
    pub fn notify_delta(&self, delta: CorpusDelta) {
        let _ = self.command_tx.send(SearchCommand::Delta(delta));
    }

    /// Move the selection cursor, wrapping modulo the delivered count.
    pub fn move_active(&mut self, up: bool) {
        let count = self.outcome.delivered.len() as i32;
        if count == 0 {
            self.outcome.active_index = -1;
            return;
        }
        let direction = if up { -1 } else { 1 };
        self.outcome.active_index = (self.outcome.active_index + direction + count) % count;
    }

    #[must_use]
    pub fn active(&self) -> Option<&ScoredResult> {
        usize::try_from(self.outcome.active_index)
            .ok()
            .and_then(|index| self.outcome.delivered.get(index))
    }

    /// Execute the active result: promote it into history and hand it to the
    /// host to act on.
    pub fn execute_active(&mut self) -> Option<ScoredResult> {
        let result = self.active()?.clone();
        self.history.add_or_promote(result.clone());
        Some(result)
    }

    /// Drop history, query text, and the current outcome.
    pub fn clear(&mut self) {
        self.history.clear();
        self.query_text.clear();
        self.outcome = SearchOutcome::empty();
    }

    fn apply_update(&mut self, update: SearchUpdate) {
        if update.id != self.latest_query_id.load(Ordering::Acquire) {
            return;
        }
        if update.category != self.category {
            return;
        }
        self.outcome = update.outcome;
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        let _ = self.command_tx.send(SearchCommand::Shutdown);
    }
}
