use image::DynamicImage;

/// Source of live video frames. `capture_frame` returns whatever is on screen now.
pub trait DeviceCamera: Send + Sync {
    fn capture_frame(&self) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>>;
}
