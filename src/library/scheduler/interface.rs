use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub type TaskId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub task: TaskId,
    pub at: Instant,
}

/// Cancellation token for one repeating task. Clones share the same flags.
///
/// At most one tick per task is in flight: a scheduler only fires when
/// `begin_tick` succeeds, and the consumer calls `finish_tick` once it has
/// handled the tick.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancelled: Arc<AtomicBool>,
    pending: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Claims the in-flight slot. `false` while the previous tick is unhandled.
    pub fn begin_tick(&self) -> bool {
        self.pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish_tick(&self) {
        self.pending.store(false, Ordering::SeqCst);
    }
}

/// Returning `false` from the callback ends the task, as if it was cancelled.
pub type TickCallback = Box<dyn Fn(Tick) -> bool + Send + Sync>;

pub trait FrameScheduler: Send + Sync {
    /// Invokes `on_tick` at most once per refresh, and never while the previous
    /// tick is still pending, until the returned handle is cancelled.
    fn schedule_repeating(&self, on_tick: TickCallback) -> TaskHandle;
}
