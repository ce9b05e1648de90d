use crate::device_display::interface::{put_line, DeviceDisplay};
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone)]
struct StatusWindow {
    lines: Arc<Mutex<Vec<String>>>,
}

impl eframe::App for StatusWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let lines = match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);

                let rect = ui.available_rect_before_wrap();
                ui.painter()
                    .rect_filled(rect, 4.0, egui::Color32::from_rgb(30, 30, 36));
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(100, 100, 100)),
                );

                for line in &lines {
                    ui.label(
                        egui::RichText::new(line)
                            .monospace()
                            .color(egui::Color32::WHITE)
                            .size(18.0),
                    );
                }
            });
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(16));
    }
}

pub struct DeviceDisplayGui {
    lines: Arc<Mutex<Vec<String>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for DeviceDisplayGui {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines = self.lines.clone();

        // The window blocks its own thread until closed
        thread::spawn(move || {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([480.0, 220.0])
                    .with_resizable(true),
                ..Default::default()
            };

            let window = StatusWindow { lines };

            let _ = eframe::run_native("Status", options, Box::new(|_cc| Box::new(window)));
        });

        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines.lock().map_err(|_| "display lock poisoned")?.clear();
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let max_lines = self.max_lines();
        let mut lines = self.lines.lock().map_err(|_| "display lock poisoned")?;
        put_line(&mut lines, max_lines, line, text)
    }
}
