use crate::library::scheduler::interface::{FrameScheduler, TaskHandle, Tick, TickCallback};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Fires ticks only when told to, so frame-loop tests are deterministic.
pub struct FrameSchedulerManual {
    next_id: AtomicU64,
    tasks: Mutex<Vec<(TaskHandle, TickCallback)>>,
}

impl FrameSchedulerManual {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Runs `refreshes` refreshes. A task whose last tick is still pending is
    /// skipped.
    pub fn advance(&self, refreshes: usize) {
        let mut tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };

        for _ in 0..refreshes {
            tasks.retain(|(handle, on_tick)| {
                if handle.is_cancelled() {
                    return false;
                }
                if !handle.begin_tick() {
                    return true;
                }
                on_tick(Tick {
                    task: handle.id(),
                    at: Instant::now(),
                })
            });
        }
    }

    pub fn active_tasks(&self) -> usize {
        let tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        tasks.iter().filter(|(handle, _)| !handle.is_cancelled()).count()
    }
}

impl Default for FrameSchedulerManual {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for FrameSchedulerManual {
    fn schedule_repeating(&self, on_tick: TickCallback) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        tasks.push((handle.clone(), on_tick));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_advance_fires_live_tasks_only() {
        let scheduler = FrameSchedulerManual::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = scheduler.schedule_repeating(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }));

        for _ in 0..3 {
            scheduler.advance(1);
            handle.finish_tick();
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.cancel();
        scheduler.advance(2);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn test_unfinished_tick_holds_back_the_next() {
        let scheduler = FrameSchedulerManual::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = scheduler.schedule_repeating(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        }));

        scheduler.advance(5);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.active_tasks(), 1);

        handle.finish_tick();
        scheduler.advance(5);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callback_returning_false_ends_task() {
        let scheduler = FrameSchedulerManual::new();
        scheduler.schedule_repeating(Box::new(|_| false));
        scheduler.advance(1);
        assert_eq!(scheduler.active_tasks(), 0);
    }
}
