//! Live accounting for numeric buffers.
//!
//! Every embedding and every intermediate training matrix holds an
//! [`Allocation`]. Dropping the owner releases the allocation, so the live
//! count returns to its baseline on every exit path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemoryTracker {
    live: Arc<AtomicUsize>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self) -> Allocation {
        self.live.fetch_add(1, Ordering::SeqCst);
        Allocation {
            live: self.live.clone(),
        }
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Allocation {
    live: Arc<AtomicUsize>,
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
