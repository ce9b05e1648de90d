use crate::device_display::interface::{put_line, DeviceDisplay};
use std::error::Error;

pub struct DeviceDisplayConsole {
    lines: Vec<String>,
    rendered: Vec<String>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            rendered: Vec::new(),
        }
    }

    fn render_display(&self) {
        let width = self
            .lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(16);
        println!("┌{}┐", "─".repeat(width));
        for line in &self.lines {
            println!("│{:<width$}│", line, width = width);
        }
        println!("└{}┘", "─".repeat(width));
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_display();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines.clear();
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let max_lines = self.max_lines();
        put_line(&mut self.lines, max_lines, line, text)
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.lines != self.rendered {
            self.render_display();
            self.rendered = self.lines.clone();
        }
        Ok(())
    }
}
