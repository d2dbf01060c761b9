//! Background search worker.
//!
//! One thread per engine consumes commands and publishes finished outcomes.
//! The shared latest-query-id counter doubles as the cancellation signal:
//! the control thread bumps it when a new session starts, and the worker
//! refuses to publish any outcome whose id is no longer the latest, so an
//! older session finishing late can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::cancel::CancelToken;
use crate::engine::SearchEngine;
use crate::index::CorpusDelta;
use crate::session::{SearchCategory, SearchOutcome};

/// Commands understood by the background search worker.
#[derive(Debug)]
pub enum SearchCommand {
    /// Run a search session for the given query text and category.
    Query {
        /// Identifier correlating the outcome with the originating request.
        id: u64,
        /// Raw query text to parse and search.
        text: String,
        /// Which category to search.
        category: SearchCategory,
    },
    /// Merge a corpus delta into the engine's index.
    Delta(CorpusDelta),
    /// Stop the worker thread.
    Shutdown,
}

/// A finished session's outcome, published back to the control thread.
#[derive(Debug)]
pub struct SearchUpdate {
    /// Identifier matching the [`SearchCommand::Query`] that produced it.
    pub id: u64,
    /// Category that was searched.
    pub category: SearchCategory,
    pub outcome: SearchOutcome,
}

/// Launch the background search worker and return its channels plus the
/// shared latest-query-id counter.
pub fn spawn(
    engine: Arc<SearchEngine>,
) -> (Sender<SearchCommand>, Receiver<SearchUpdate>, Arc<AtomicU64>) {
    let (command_tx, command_rx) = mpsc::channel();
    let (update_tx, update_rx) = mpsc::channel();
    let latest_query_id = Arc::new(AtomicU64::new(0));
    let thread_latest = Arc::clone(&latest_query_id);

    thread::spawn(move || worker_loop(&engine, &command_rx, &update_tx, &thread_latest));

    (command_tx, update_rx, latest_query_id)
}

fn worker_loop(
    engine: &SearchEngine,
    command_rx: &Receiver<SearchCommand>,
    update_tx: &Sender<SearchUpdate>,
    latest_query_id: &Arc<AtomicU64>,
) {
    while let Ok(command) = command_rx.recv() {
        if !handle_command(engine, update_tx, latest_query_id, command) {
            break;
        }
    }
}

fn handle_command(
    engine: &SearchEngine,
    update_tx: &Sender<SearchUpdate>,
    latest_query_id: &Arc<AtomicU64>,
    command: SearchCommand,
) -> bool {
    match command {
        SearchCommand::Query { id, text, category } => {
            let token = CancelToken::new(Arc::clone(latest_query_id), id);
            if let Some(outcome) = engine.search(&text, category, &token) {
                // Superseded between completion and delivery: stay silent.
                if !token.is_cancelled() {
                    let _ = update_tx.send(SearchUpdate {
                        id,
                        category,
                        outcome,
                    });
                }
            }
            true
        }
        SearchCommand::Delta(delta) => {
            if let Err(err) = engine.apply_delta(&delta) {
                log::warn!("failed to apply corpus delta: {err}");
            }
            true
        }
        SearchCommand::Shutdown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::StaticCorpus;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn engine() -> Arc<SearchEngine> {
        Arc::new(SearchEngine::new(StaticCorpus::new([
            "Assets/Foo/Player.cs",
            "Assets/Bar/Enemy.cs",
        ])))
    }

    #[test]
    fn queries_round_trip_through_the_worker() {
        let (tx, rx, latest) = spawn(engine());
        latest.store(1, Ordering::Release);
        tx.send(SearchCommand::Query {
            id: 1,
            text: "play".to_string(),
            category: SearchCategory::Paths,
        })
        .expect("send");

        let update = rx.recv_timeout(Duration::from_secs(5)).expect("update");
        assert_eq!(update.id, 1);
        assert_eq!(update.outcome.total_count, 1);
        assert_eq!(
            update.outcome.delivered[0].entry.path,
            "Assets/Foo/Player.cs"
        );

        tx.send(SearchCommand::Shutdown).expect("send");
    }

    #[test]
    fn stale_queries_are_never_published() {
        let (tx, rx, latest) = spawn(engine());
        // The id is already stale by the time the worker sees the command.
        latest.store(2, Ordering::Release);
        tx.send(SearchCommand::Query {
            id: 1,
            text: "play".to_string(),
            category: SearchCategory::Paths,
        })
        .expect("send");
        tx.send(SearchCommand::Query {
            id: 2,
            text: "enemy".to_string(),
            category: SearchCategory::Paths,
        })
        .expect("send");

        let update = rx.recv_timeout(Duration::from_secs(5)).expect("update");
        assert_eq!(update.id, 2);
        assert_eq!(
            update.outcome.delivered[0].entry.path,
            "Assets/Bar/Enemy.cs"
        );
        assert!(rx.try_recv().is_err());

        tx.send(SearchCommand::Shutdown).expect("send");
    }

    #[test]
    fn shutdown_stops_the_worker() {
        let (tx, rx, _latest) = spawn(engine());
        tx.send(SearchCommand::Shutdown).expect("send");
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }
}
