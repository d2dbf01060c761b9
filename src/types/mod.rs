mod entry;
mod result;

pub use entry::{Entry, EntryId, EntryKind};
pub use result::{ResultKey, ScoredResult, UNSCORED};

pub(crate) use entry::file_stem;
