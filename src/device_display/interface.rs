use std::error::Error;

/// Status surface showing sample counts or the live prediction.
pub trait DeviceDisplay: Send + Sync {
    /// Prepare the surface before the first write.
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Remove all text from the surface.
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write text to a line (0-based). Lines past the end grow the surface
    /// up to `max_lines`.
    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Present what was written since the last `clear`.
    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn max_lines(&self) -> usize {
        16
    }
}

/// Grows `lines` so `line` is addressable and stores `text` there.
pub fn put_line(
    lines: &mut Vec<String>,
    max_lines: usize,
    line: usize,
    text: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if line >= max_lines {
        return Err(format!("Invalid line number {} (max {})", line, max_lines).into());
    }
    if lines.len() <= line {
        lines.resize(line + 1, String::new());
    }
    lines[line] = text.to_string();
    Ok(())
}
