//! Fits the classifier head on the gathered samples and assembles the
//! composed model.

mod batch;
mod composed;
mod one_hot;

pub use batch::TrainingBatch;
pub use composed::ComposedModel;

use crate::classifier_head::ClassifierHead;
use crate::config::TrainingConfig;
use crate::error::SessionError;
use crate::feature_extractor::interface::FeatureExtractor;
use crate::library::logger::interface::Logger;
use crate::library::memory::MemoryTracker;
use crate::sample_buffer::SampleBuffer;
use ndarray::Axis;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct EpochLogs {
    pub epoch: usize,
    pub loss: f32,
    pub accuracy: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub samples: usize,
    pub epochs: Vec<EpochLogs>,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f32> {
        self.epochs.last().map(|logs| logs.loss)
    }
}

pub struct TrainingOutcome {
    pub head: ClassifierHead,
    pub composed: ComposedModel,
    pub report: TrainingReport,
}

pub struct Trainer {
    config: TrainingConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Trainer {
    pub fn new(config: TrainingConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("trainer"),
        }
    }

    /// Trains a copy of `head`; the caller's head is only replaced when the
    /// returned outcome is committed.
    #[allow(clippy::too_many_arguments)]
    pub fn train<R: Rng>(
        &self,
        buffer: &mut SampleBuffer,
        head: &ClassifierHead,
        extractor: Arc<dyn FeatureExtractor + Send + Sync>,
        class_names: &[String],
        memory: &MemoryTracker,
        rng: &mut R,
        on_epoch: &mut dyn FnMut(&EpochLogs),
    ) -> Result<TrainingOutcome, SessionError> {
        let missing = buffer.missing_classes();
        if !missing.is_empty() {
            return Err(SessionError::InsufficientData {
                missing: missing
                    .iter()
                    .map(|class_id| {
                        class_names
                            .get(*class_id)
                            .cloned()
                            .unwrap_or_else(|| format!("class {}", class_id + 1))
                    })
                    .collect(),
            });
        }

        buffer.paired_shuffle(rng);

        let mut head = head.clone();
        let report = {
            let batch = TrainingBatch::stack(buffer, memory)?;
            self.fit(&mut head, &batch, rng, on_epoch)?
        };

        let composed = ComposedModel::new(extractor, head.clone(), class_names.to_vec())?;
        let _ = self
            .logger
            .info(&format!("Composed model: {}", composed.summary()));

        Ok(TrainingOutcome {
            head,
            composed,
            report,
        })
    }

    fn fit<R: Rng>(
        &self,
        head: &mut ClassifierHead,
        batch: &TrainingBatch,
        rng: &mut R,
        on_epoch: &mut dyn FnMut(&EpochLogs),
    ) -> Result<TrainingReport, SessionError> {
        let samples = batch.len();
        let mut report = TrainingReport {
            samples,
            epochs: Vec::with_capacity(self.config.epochs),
        };
        let mut order: Vec<usize> = (0..samples).collect();

        for epoch in 0..self.config.epochs {
            if self.config.shuffle_each_epoch {
                order.shuffle(rng);
            }

            let mut loss_sum = 0.0;
            let mut correct = 0;
            for chunk in order.chunks(self.config.batch_size.max(1)) {
                let inputs = batch.inputs.select(Axis(0), chunk);
                let targets = batch.targets.select(Axis(0), chunk);
                let stats = head.train_batch(&inputs.view(), &targets.view())?;
                loss_sum += stats.loss * chunk.len() as f32;
                correct += stats.correct;
            }

            let logs = EpochLogs {
                epoch,
                loss: loss_sum / samples.max(1) as f32,
                accuracy: correct as f32 / samples.max(1) as f32,
            };
            let _ = self.logger.info(&format!(
                "Data for epoch {}: loss {:.4}, acc {:.4}",
                logs.epoch, logs.loss, logs.accuracy
            ));
            on_epoch(&logs);
            report.epochs.push(logs);
        }

        Ok(report)
    }
}
