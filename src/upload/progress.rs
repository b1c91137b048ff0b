use std::sync::atomic::{AtomicU64, Ordering};

/// Completion counter shared by all workers. `total` is fixed once, after
/// the enumeration phase and before dispatch begins; `completed` moves only
/// through `increment` and therefore never exceeds `total` as long as each
/// task is consumed exactly once.
#[derive(Debug)]
pub struct ProgressCounter {
    completed: AtomicU64,
    total: u64,
}

impl ProgressCounter {
    pub fn new(total: u64) -> Self {
        Self { completed: AtomicU64::new(0), total }
    }

    /// Atomically bump the completed count and return the post-increment
    /// value. Safe under arbitrary concurrent invocation; no increment is
    /// lost.
    pub fn increment(&self) -> u64 {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// A consistent `(completed, total)` read.
    pub fn snapshot(&self) -> (u64, u64) {
        (self.completed.load(Ordering::SeqCst), self.total)
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
