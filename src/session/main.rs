use crate::classifier_head::{ClassifierHead, Prediction};
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::error::SessionError;
use crate::exporter::interface::{ModelArtifact, ModelStore};
use crate::exporter::Exporter;
use crate::feature_extractor::image::blank_frame;
use crate::feature_extractor::interface::FeatureExtractor;
use crate::library::logger::interface::Logger;
use crate::library::memory::MemoryTracker;
use crate::library::scheduler::interface::{FrameScheduler, TaskHandle, Tick};
use crate::sample_buffer::SampleBuffer;
use crate::session::command::Command;
use crate::session::core::{init, transition, Msg, State};
use crate::trainer::{ComposedModel, Trainer, TrainingReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Whether the command loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// One interactive teaching session: gather labelled frames, fit the
/// classifier head, then classify live frames.
///
/// All mutation happens on the thread that owns the session. The frame loop
/// only ever sends `Command::Tick` through the command channel, so at most one
/// of gathering, predicting or training is running at any time.
pub struct Session {
    pub(super) config: Config,
    pub(super) logger: Arc<dyn Logger + Send + Sync>,
    pub(super) frame_source: Arc<dyn DeviceCamera + Send + Sync>,
    pub(super) extractor: Arc<dyn FeatureExtractor + Send + Sync>,
    pub(super) display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    pub(super) scheduler: Arc<dyn FrameScheduler + Send + Sync>,
    pub(super) exporter: Exporter,
    pub(super) trainer: Trainer,
    pub(super) memory: MemoryTracker,
    pub(super) rng: StdRng,
    pub(super) state: State,
    pub(super) buffer: SampleBuffer,
    pub(super) head: ClassifierHead,
    pub(super) composed: Option<ComposedModel>,
    pub(super) prediction: Option<Prediction>,
    pub(super) last_report: Option<TrainingReport>,
    pub(super) loop_handle: Option<TaskHandle>,
    pub(super) command_sender: Sender<Command>,
    pub(super) command_receiver: Receiver<Command>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        frame_source: Arc<dyn DeviceCamera + Send + Sync>,
        extractor: Arc<dyn FeatureExtractor + Send + Sync>,
        display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        scheduler: Arc<dyn FrameScheduler + Send + Sync>,
        model_store: Arc<dyn ModelStore + Send + Sync>,
    ) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::InvalidConfig)?;
        let logger = logger.with_namespace("session");

        let embedding_dim = warm_up(&config, extractor.as_ref())?;
        let _ = logger.info(&format!("Warm-up embedding shape [{}]", embedding_dim));

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let head = ClassifierHead::new(
            embedding_dim,
            config.training.hidden_units,
            config.num_classes(),
            config.training.learning_rate,
            &mut rng,
        );
        let _ = logger.info(&format!("Classifier head: {}", head.summary()));

        let (command_sender, command_receiver) = channel();
        let mut session = Self {
            buffer: SampleBuffer::new(config.num_classes(), embedding_dim),
            trainer: Trainer::new(config.training.clone(), logger.clone()),
            exporter: Exporter::new(model_store, logger.clone()),
            memory: MemoryTracker::new(),
            state: State::Idle,
            composed: None,
            prediction: None,
            last_report: None,
            loop_handle: None,
            config,
            logger,
            frame_source,
            extractor,
            display,
            scheduler,
            rng,
            head,
            command_sender,
            command_receiver,
        };

        session
            .display
            .lock()
            .map_err(|_| SessionError::Display("display lock poisoned".into()))?
            .init()
            .map_err(SessionError::Display)?;

        let (state, effects) = init();
        session.state = state;
        session.run_effects(effects)?;

        Ok(session)
    }

    /// Starts gathering `class_id`, or stops it when that class is already
    /// being gathered. Toggling while predicting switches to gathering.
    pub fn toggle_gather(&mut self, class_id: usize) -> Result<(), SessionError> {
        self.dispatch(Msg::ToggleGather { class_id })
    }

    /// Fits the head on everything gathered so far and switches to
    /// predicting. A failed fit leaves the previous head and state in place.
    pub fn train(&mut self) -> Result<TrainingReport, SessionError> {
        let counts_by_class = self.buffer.counts_by_class().to_vec();
        self.dispatch(Msg::Train { counts_by_class })?;
        self.last_report
            .clone()
            .ok_or_else(|| SessionError::Fit("fit finished without a report".to_string()))
    }

    pub fn save(&self, name: &str) -> Result<ModelArtifact, SessionError> {
        let composed = self.composed.as_ref().ok_or(SessionError::NotTrained)?;
        self.exporter.save(name, composed)
    }

    /// Stops any loop and drops every gathered sample. The trained head and
    /// composed model are kept.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.dispatch(Msg::Reset)
    }

    /// Runs one loop iteration, then lets the loop schedule the next one.
    /// Ticks from a loop that has since been stopped or replaced are ignored.
    pub fn handle_tick(&mut self, tick: Tick) -> Result<(), SessionError> {
        let current = match self.loop_handle.as_ref() {
            Some(handle) if !handle.is_cancelled() && handle.id() == tick.task => {
                handle.clone()
            }
            _ => return Ok(()),
        };

        let waited = tick.at.elapsed();
        if waited > self.config.tick_rate * 4 {
            let _ = self.logger.warn(&format!(
                "Frame loop {} is running {}ms behind",
                tick.task,
                waited.as_millis()
            ));
        }

        let handled = self.dispatch(Msg::Tick);
        current.finish_tick();
        handled
    }

    pub fn handle_command(&mut self, command: Command) -> Result<Flow, SessionError> {
        match command {
            Command::ToggleGather { class_id } => self.toggle_gather(class_id)?,
            Command::Train => {
                self.train()?;
            }
            Command::Save { name } => {
                self.save(&name)?;
            }
            Command::Reset => self.reset()?,
            Command::Tick(tick) => self.handle_tick(tick)?,
            Command::Shutdown => {
                self.stop_loop();
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }

    /// Handles every command already queued, without blocking.
    #[cfg(test)]
    pub fn drain(&mut self) -> Result<Flow, SessionError> {
        use std::sync::mpsc::TryRecvError;

        loop {
            match self.command_receiver.try_recv() {
                Ok(command) => {
                    if self.handle_command(command)? == Flow::Stop {
                        return Ok(Flow::Stop);
                    }
                }
                Err(TryRecvError::Empty) => return Ok(Flow::Continue),
                Err(TryRecvError::Disconnected) => return Ok(Flow::Stop),
            }
        }
    }

    pub fn sender(&self) -> Sender<Command> {
        self.command_sender.clone()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn counts_by_class(&self) -> &[usize] {
        self.buffer.counts_by_class()
    }

    #[cfg(test)]
    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    pub fn composed_model(&self) -> Option<&ComposedModel> {
        self.composed.as_ref()
    }

    pub fn last_report(&self) -> Option<&TrainingReport> {
        self.last_report.as_ref()
    }

    pub fn memory(&self) -> &MemoryTracker {
        &self.memory
    }

    pub(super) fn dispatch(&mut self, msg: Msg) -> Result<(), SessionError> {
        let quiet = msg == Msg::Tick;
        let old_state = self.state;

        let (new_state, effects) = match transition(&self.config, old_state, msg.clone()) {
            Ok(next) => next,
            Err(error) => {
                let _ = self
                    .logger
                    .warn(&format!("Rejected {:?} while {}: {}", msg, old_state, error));
                return Err(error);
            }
        };

        if !quiet {
            let _ = self.logger.info(&format!(
                "{:?}: {} -> {}, effects {:?}",
                msg, old_state, new_state, effects
            ));
        }

        self.state = new_state;
        self.run_effects(effects)
    }
}

/// Runs the extractor once on a blank frame so the first real frame does
/// not pay for initialisation, and checks it produces the advertised size.
fn warm_up(config: &Config, extractor: &dyn FeatureExtractor) -> Result<usize, SessionError> {
    let (height, width) = config.model_input;
    let embedding = extractor
        .embed(&blank_frame(width, height))
        .map_err(SessionError::Extract)?;

    let expected = extractor.embedding_dim();
    if embedding.len() != expected || expected == 0 {
        return Err(SessionError::ShapeMismatch {
            expected: vec![expected],
            got: vec![embedding.len()],
        });
    }
    Ok(expected)
}
