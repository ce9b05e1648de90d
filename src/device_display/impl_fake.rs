use crate::device_display::interface::{put_line, DeviceDisplay};
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Keeps the current lines in a shared buffer tests can read back.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    lines: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    /// While set, every write is refused, as if the screen went away.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines.lock().map_err(|_| "display lock poisoned")?.clear();
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("display disconnected".into());
        }
        let max_lines = self.max_lines();
        let mut lines = self.lines.lock().map_err(|_| "display lock poisoned")?;
        put_line(&mut lines, max_lines, line, text)
    }
}
