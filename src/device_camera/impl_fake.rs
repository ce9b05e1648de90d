use crate::device_camera::interface::DeviceCamera;
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Produces solid-colour frames. The colour ("scene") can be switched at any
/// time to stand in for pointing the camera at a different object.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
    scene: Mutex<Rgb<u8>>,
    captured: AtomicUsize,
    failing: AtomicBool,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, width: u32, height: u32) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            width,
            height,
            scene: Mutex::new(Rgb([0, 0, 0])),
            captured: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_scene(&self, color: Rgb<u8>) {
        let mut scene = match self.scene.lock() {
            Ok(scene) => scene,
            Err(poisoned) => poisoned.into_inner(),
        };
        *scene = color;
    }

    #[cfg(test)]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn captured(&self) -> usize {
        self.captured.load(Ordering::SeqCst)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
        if self.failing.load(Ordering::SeqCst) {
            self.logger.info("Capture failed")?;
            return Err("camera unavailable".into());
        }

        let color = *self.scene.lock().map_err(|_| "scene lock poisoned")?;
        let frame = RgbImage::from_pixel(self.width, self.height, color);
        self.captured.fetch_add(1, Ordering::SeqCst);

        Ok(DynamicImage::ImageRgb8(frame))
    }
}
