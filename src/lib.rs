//! Interactive fuzzy-search engine core.
//!
//! The crate indexes a corpus of path-like entries, commands, and live
//! objects, and answers every keystroke with a ranked, capped result list.
//! Hosts feed it providers and query text; it hands back
//! [`session::SearchOutcome`] values. The root module re-exports the types an
//! embedder needs so that wiring an engine up never requires digging through
//! the module hierarchy.

pub mod app_dirs;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod filter;
pub mod history;
pub mod index;
pub mod providers;
pub mod query;
pub mod score;
pub mod session;
pub mod types;
pub mod worker;

mod identity;

pub use engine::{SearchEngine, SessionState};
pub use error::{Result, SearchError};
pub use history::HistoryList;
pub use index::{CorpusDelta, CorpusIndex, FilesystemCorpus, IndexSnapshot, WalkOptions};
pub use providers::{
    CommandProvider, CorpusProvider, LiveObject, LiveObjectProvider, StaticCommands, StaticCorpus,
    StaticObjects,
};
pub use query::Query;
pub use score::ScoreStrategy;
pub use session::{MIN_KEYWORD_LEN, RESULT_CAP, SearchCategory, SearchOutcome};
pub use types::{Entry, EntryId, EntryKind, ResultKey, ScoredResult};
