//! Cooperative cancellation for in-flight search sessions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Latest-wins cancellation token.
///
/// Every session is tagged with the query id that started it; publishing a
/// newer id through the shared counter cancels all older sessions the next
/// time they poll. Sessions check at phase boundaries and immediately before
/// delivering results, so a superseded session never mutates visible state.
#[derive(Debug, Clone)]
pub struct CancelToken {
    latest: Arc<AtomicU64>,
    id: u64,
}

impl CancelToken {
    #[must_use]
    pub fn new(latest: Arc<AtomicU64>, id: u64) -> Self {
        Self { latest, id }
    }

    /// Token for one-shot callers that nothing can supersede.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(Arc::new(AtomicU64::new(0)), 0)
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_id_cancels_older_tokens() {
        let latest = Arc::new(AtomicU64::new(1));
        let first = CancelToken::new(Arc::clone(&latest), 1);
        assert!(!first.is_cancelled());

        latest.store(2, Ordering::Release);
        assert!(first.is_cancelled());
        assert!(!CancelToken::new(latest, 2).is_cancelled());
    }

    #[test]
    fn detached_tokens_never_cancel() {
        assert!(!CancelToken::detached().is_cancelled());
    }
}
