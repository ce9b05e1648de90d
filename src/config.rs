use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

/// Frames are resized to this width before the feature extractor runs.
pub const MODEL_INPUT_WIDTH: u32 = 224;
/// Frames are resized to this height before the feature extractor runs.
pub const MODEL_INPUT_HEIGHT: u32 = 224;
/// Number of samples per gradient update.
pub const TRAIN_BATCH_SIZE: usize = 5;
/// Number of full passes over the sample buffer per `train()` call.
pub const TRAIN_EPOCHS: usize = 5;
/// Width of the classifier head's hidden ReLU layer.
pub const HIDDEN_UNITS: usize = 64;
/// Adam step size.
pub const LEARNING_RATE: f32 = 0.001;
/// Cadence of the gather/predict loop, roughly one display refresh at 60 Hz.
pub const DISPLAY_REFRESH_RATE: Duration = Duration::from_millis(16);

pub const DEFAULT_CLASS_NAMES: [&str; 2] = ["class 1", "class 2"];

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub batch_size: usize,
    pub epochs: usize,
    pub learning_rate: f32,
    pub hidden_units: usize,
    pub shuffle_each_epoch: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: TRAIN_BATCH_SIZE,
            epochs: TRAIN_EPOCHS,
            learning_rate: LEARNING_RATE,
            hidden_units: HIDDEN_UNITS,
            shuffle_each_epoch: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub class_names: Vec<String>,
    /// (height, width)
    pub model_input: (u32, u32),
    pub training: TrainingConfig,
    pub tick_rate: Duration,
    pub seed: Option<u64>,
    pub export_dir: PathBuf,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_names: DEFAULT_CLASS_NAMES.iter().map(|n| n.to_string()).collect(),
            model_input: (MODEL_INPUT_HEIGHT, MODEL_INPUT_WIDTH),
            training: TrainingConfig::default(),
            tick_rate: DISPLAY_REFRESH_RATE,
            seed: None,
            export_dir: PathBuf::from("models"),
            logger_timezone: mountain_standard_time(),
        }
    }
}

impl Config {
    pub fn with_class_names(mut self, class_names: &[&str]) -> Self {
        self.class_names = class_names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.class_names.len() < 2 {
            return Err(format!(
                "at least 2 classes are required, got {}",
                self.class_names.len()
            ));
        }
        if self.training.batch_size == 0 {
            return Err("batch size must be positive".to_string());
        }
        if self.training.epochs == 0 {
            return Err("epoch count must be positive".to_string());
        }
        if self.training.hidden_units == 0 {
            return Err("hidden units must be positive".to_string());
        }
        if !(self.training.learning_rate > 0.0) {
            return Err("learning rate must be positive".to_string());
        }
        if self.model_input.0 == 0 || self.model_input.1 == 0 {
            return Err("model input resolution must be non-zero".to_string());
        }
        Ok(())
    }
}

fn mountain_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::west_opt(7 * 3600).unwrap_or_else(|| chrono::Utc.fix())
}
