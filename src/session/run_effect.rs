use crate::classifier_head::Prediction;
use crate::error::SessionError;
use crate::sample_buffer::Embedding;
use crate::session::command::Command;
use crate::session::core::{Effect, Msg};
use crate::session::main::Session;
use crate::trainer::EpochLogs;

impl Session {
    pub(super) fn run_effects(&mut self, effects: Vec<Effect>) -> Result<(), SessionError> {
        for effect in effects {
            self.run_effect(effect)?;
        }
        Ok(())
    }

    fn run_effect(&mut self, effect: Effect) -> Result<(), SessionError> {
        match effect {
            Effect::StartLoop => {
                self.start_loop();
                Ok(())
            }
            Effect::StopLoop => {
                self.stop_loop();
                Ok(())
            }
            Effect::GatherSample { class_id } => self.gather_sample(class_id),
            Effect::PredictFrame => self.predict_frame(),
            Effect::Fit => match self.fit() {
                Ok(()) => self.dispatch(Msg::FitDone),
                Err(error) => {
                    let _ = self.logger.warn(&format!("Training failed: {}", error));
                    self.dispatch(Msg::FitFailed)?;
                    Err(error)
                }
            },
            Effect::ClearBuffer => {
                if !self.buffer.is_empty() {
                    let _ = self
                        .logger
                        .info(&format!("Dropping {} gathered samples", self.buffer.len()));
                }
                self.buffer.clear();
                self.prediction = None;
                let _ = self.logger.info(&format!(
                    "Numeric buffers in memory: {}",
                    self.memory.live()
                ));
                Ok(())
            }
            // A committed transition stands even when the screen can't show it.
            Effect::Render => {
                if let Err(error) = self.render() {
                    let _ = self.logger.warn(&format!("Render skipped: {}", error));
                }
                Ok(())
            }
        }
    }

    fn start_loop(&mut self) {
        self.stop_loop();

        let sender = self.command_sender.clone();
        let handle = self
            .scheduler
            .schedule_repeating(Box::new(move |tick| sender.send(Command::Tick(tick)).is_ok()));
        let _ = self
            .logger
            .info(&format!("Started frame loop {}", handle.id()));
        self.loop_handle = Some(handle);
    }

    pub(super) fn stop_loop(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            handle.cancel();
            let _ = self
                .logger
                .info(&format!("Stopped frame loop {}", handle.id()));
        }
    }

    fn gather_sample(&mut self, class_id: usize) -> Result<(), SessionError> {
        let frame = self
            .frame_source
            .capture_frame()
            .map_err(SessionError::Capture)?;
        let values = self.extractor.embed(&frame).map_err(SessionError::Extract)?;
        let embedding = Embedding::new(values, self.memory.allocate());
        self.buffer.append(embedding, class_id)
    }

    fn predict_frame(&mut self) -> Result<(), SessionError> {
        let frame = self
            .frame_source
            .capture_frame()
            .map_err(SessionError::Capture)?;
        let values = self.extractor.embed(&frame).map_err(SessionError::Extract)?;

        // The embedding and the probabilities only live for this iteration.
        let embedding = Embedding::new(values, self.memory.allocate());
        let _probabilities_allocation = self.memory.allocate();
        let probabilities = self.head.predict(&embedding.values().view())?;

        self.prediction =
            Prediction::from_probabilities(probabilities.view(), &self.config.class_names);
        Ok(())
    }

    fn fit(&mut self) -> Result<(), SessionError> {
        let display = self.display.clone();
        let epochs = self.config.training.epochs;
        let mut on_epoch = |logs: &EpochLogs| {
            if let Ok(mut display) = display.lock() {
                let _ = display.write_line(
                    1,
                    &format!("Epoch {}/{} loss {:.4}", logs.epoch + 1, epochs, logs.loss),
                );
                let _ = display.flush();
            }
        };

        let outcome = self.trainer.train(
            &mut self.buffer,
            &self.head,
            self.extractor.clone(),
            &self.config.class_names,
            &self.memory,
            &mut self.rng,
            &mut on_epoch,
        )?;

        self.head = outcome.head;
        self.composed = Some(outcome.composed);
        self.last_report = Some(outcome.report);
        self.prediction = None;
        let _ = self.logger.info(&format!(
            "Numeric buffers in memory after training: {}",
            self.memory.live()
        ));
        Ok(())
    }
}
