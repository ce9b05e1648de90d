use crate::library::logger::interface::Logger;
use crate::library::scheduler::interface::{FrameScheduler, TaskHandle, Tick, TickCallback};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct FrameSchedulerThread {
    tick_rate: Duration,
    next_id: AtomicU64,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSchedulerThread {
    pub fn new(tick_rate: Duration, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            tick_rate,
            next_id: AtomicU64::new(1),
            logger: logger.with_namespace("scheduler"),
        }
    }
}

impl FrameScheduler for FrameSchedulerThread {
    fn schedule_repeating(&self, on_tick: TickCallback) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let task = handle.clone();
        let tick_rate = self.tick_rate;
        let logger = self.logger.clone();

        let _ = logger.info(&format!("Task {} started", task.id()));

        std::thread::spawn(move || {
            loop {
                std::thread::sleep(tick_rate);
                if task.is_cancelled() {
                    break;
                }
                if !task.begin_tick() {
                    continue;
                }
                if !on_tick(Tick {
                    task: task.id(),
                    at: Instant::now(),
                }) {
                    break;
                }
            }
            let _ = logger.info(&format!("Task {} finished", task.id()));
        });

        handle
    }
}
