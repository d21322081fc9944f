//! Monotonic tags for in-flight searches.
//!
//! Responses can come back in any order. Only the response carrying the most recently issued
//! tag may replace the catalog snapshot.
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a new request, making every earlier tag stale.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_latest(&self, tag: u64) -> bool {
        self.latest.load(Ordering::Acquire) == tag
    }
}
