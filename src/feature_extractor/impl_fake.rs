use crate::feature_extractor::image::frame_to_tensor;
use crate::feature_extractor::interface::{ExtractorDescriptor, FeatureExtractor};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use ndarray::{s, Array1};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Stand-in backbone: average-pools the normalised frame into a
/// `grid` x `grid` x 3 colour descriptor.
pub struct FeatureExtractorFake {
    logger: Arc<dyn Logger + Send + Sync>,
    input_shape: (u32, u32),
    grid: usize,
    corrupt: AtomicBool,
    delay_micros: AtomicU64,
}

impl FeatureExtractorFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, input_shape: (u32, u32), grid: usize) -> Self {
        let grid = grid
            .max(1)
            .min(input_shape.0 as usize)
            .min(input_shape.1 as usize)
            .max(1);
        Self {
            logger: logger.with_namespace("extractor").with_namespace("fake"),
            input_shape,
            grid,
            corrupt: AtomicBool::new(false),
            delay_micros: AtomicU64::new(0),
        }
    }

    /// Time each `embed` call takes, standing in for a real backbone's
    /// forward pass.
    pub fn set_delay(&self, delay: Duration) {
        let micros = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.delay_micros.store(micros, Ordering::SeqCst);
    }

    /// While set, every embedding is NaN, simulating a broken backbone.
    #[cfg(test)]
    pub fn set_corrupt(&self, corrupt: bool) {
        self.corrupt.store(corrupt, Ordering::SeqCst);
    }
}

impl FeatureExtractor for FeatureExtractorFake {
    fn descriptor(&self) -> ExtractorDescriptor {
        ExtractorDescriptor {
            name: format!("fake-colour-grid-{}", self.grid),
            embedding_dim: self.grid * self.grid * 3,
            input_shape: self.input_shape,
        }
    }

    fn embed(
        &self,
        frame: &DynamicImage,
    ) -> Result<Array1<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = self.input_shape;
        let tensor = frame_to_tensor(frame, width, height);
        let (height, width) = (height as usize, width as usize);

        let delay = self.delay_micros.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_micros(delay));
        }

        if self.corrupt.load(Ordering::SeqCst) {
            self.logger.info("Emitting corrupt embedding")?;
            return Ok(Array1::from_elem(self.embedding_dim(), f32::NAN));
        }

        let mut values = Vec::with_capacity(self.embedding_dim());
        for gy in 0..self.grid {
            let (y0, y1) = (gy * height / self.grid, (gy + 1) * height / self.grid);
            for gx in 0..self.grid {
                let (x0, x1) = (gx * width / self.grid, (gx + 1) * width / self.grid);
                for c in 0..3 {
                    let cell = tensor.slice(s![0, y0..y1, x0..x1, c]);
                    values.push(cell.mean().unwrap_or(0.0));
                }
            }
        }

        Ok(Array1::from(values))
    }
}
