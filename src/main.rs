use classifier_head::ClassifierHead;
use config::Config;
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::interface::DeviceCamera;
use device_display::{
    impl_console::DeviceDisplayConsole, impl_gui::DeviceDisplayGui, interface::DeviceDisplay,
};
use exporter::impl_file::ModelStoreFile;
use exporter::interface::ModelStore;
use feature_extractor::impl_fake::FeatureExtractorFake;
use image::Rgb;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use library::scheduler::impl_thread::FrameSchedulerThread;
use session::{Command, Session};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use trainer::ComposedModel;

mod classifier_head;
mod config;
#[allow(dead_code)]
mod detection;
mod device_camera;
mod device_display;
mod error;
mod exporter;
mod feature_extractor;
mod library;
mod sample_buffer;
mod session;
mod trainer;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default().with_class_names(&["red thing", "blue thing"]);

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let camera = Arc::new(DeviceCameraFake::new(logger.clone(), 320, 240));

    let extractor = Arc::new(FeatureExtractorFake::new(logger.clone(), config.model_input, 4));
    // Roughly what a small pretrained backbone costs per frame on a laptop CPU.
    extractor.set_delay(Duration::from_millis(8));

    let display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
        if std::env::args().any(|arg| arg == "--gui") {
            Arc::new(Mutex::new(DeviceDisplayGui::new()))
        } else {
            Arc::new(Mutex::new(DeviceDisplayConsole::new()))
        };

    let scheduler = Arc::new(FrameSchedulerThread::new(config.tick_rate, logger.clone()));

    let model_store = Arc::new(ModelStoreFile::new(config.export_dir.clone(), logger.clone()));

    let learning_rate = config.training.learning_rate;

    let mut session = Session::new(
        config,
        logger.clone(),
        camera.clone(),
        extractor.clone(),
        display,
        scheduler,
        model_store.clone(),
    )?;

    let script = {
        let sender = session.sender();
        let camera = camera.clone();
        let logger = logger.clone();
        thread::spawn(move || {
            if let Err(error) = run_script(&camera, &sender) {
                let _ = logger.warn(&format!("Demo script stopped: {}", error));
                let _ = sender.send(Command::Shutdown);
            }
        })
    };

    session.run()?;

    let _ = script.join();

    let _ = logger.info(&format!(
        "Session ended {} with samples {:?} and {} numeric buffers in memory",
        session.state(),
        session.counts_by_class(),
        session.memory().live()
    ));
    if let Some(report) = session.last_report() {
        let _ = logger.info(&format!(
            "Last fit: {} samples, final loss {:?}",
            report.samples,
            report.final_loss()
        ));
    }

    if let Err(error) = check_saved_model(
        &session,
        model_store.as_ref(),
        extractor,
        &camera,
        learning_rate,
        logger.as_ref(),
    ) {
        let _ = logger.warn(&format!("Could not check the saved model: {}", error));
    }

    Ok(())
}

/// Walks the session through gather, train, predict and save, pointing the
/// fake camera at a different colour for each class.
fn run_script(
    camera: &DeviceCameraFake,
    sender: &Sender<Command>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let pause = Duration::from_millis(400);

    for (class_id, color) in [(0, Rgb([220, 30, 30])), (1, Rgb([30, 30, 220]))] {
        camera.set_scene(color);
        sender.send(Command::ToggleGather { class_id })?;
        thread::sleep(pause);
        sender.send(Command::ToggleGather { class_id })?;
    }

    sender.send(Command::Train)?;

    for color in [Rgb([220, 30, 30]), Rgb([30, 30, 220])] {
        camera.set_scene(color);
        thread::sleep(pause);
    }

    sender.send(Command::Save {
        name: "demo".to_string(),
    })?;
    sender.send(Command::Reset)?;
    sender.send(Command::Shutdown)?;

    Ok(())
}

/// Reloads the saved model into a fresh composition and checks it agrees
/// with the one the session still holds.
fn check_saved_model(
    session: &Session,
    model_store: &ModelStoreFile,
    extractor: Arc<FeatureExtractorFake>,
    camera: &DeviceCameraFake,
    learning_rate: f32,
    logger: &dyn Logger,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let artifact = model_store.load("demo")?;
    let head = ClassifierHead::from_weights(artifact.head, learning_rate);
    let reloaded = ComposedModel::new(extractor, head, artifact.class_names)?;

    camera.set_scene(Rgb([220, 30, 30]));
    let frame = camera.capture_frame()?;

    if let Some(prediction) = reloaded.classify(&frame)? {
        logger.info(&format!(
            "Reloaded {:?} from {} (saved {}) sees class {} {:?} at {}%",
            artifact.name,
            model_store.dir().display(),
            artifact.created_at,
            prediction.class_id,
            prediction.class_name,
            prediction.confidence
        ))?;
    }
    if let Some(live) = session.composed_model() {
        let agrees = live.classify(&frame)? == reloaded.classify(&frame)?;
        logger.info(&format!("Reloaded model agrees with the session: {}", agrees))?;
    }

    Ok(())
}
