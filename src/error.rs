use thiserror::Error;

/// Errors surfaced by the search core.
///
/// Most failure modes in the engine are deliberately not errors: malformed
/// query directives parse to something sensible, unknown identifiers resolve
/// to nothing, and cancelled sessions simply deliver no outcome. What remains
/// is the corpus itself becoming unreachable.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The corpus provider could not enumerate the corpus at all.
    #[error("corpus enumeration failed: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
