use image::DynamicImage;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Identifies the frozen backbone a head was trained against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorDescriptor {
    pub name: String,
    pub embedding_dim: usize,
    /// (height, width)
    pub input_shape: (u32, u32),
}

/// Frozen pretrained network: frame in, fixed-length embedding out.
pub trait FeatureExtractor: Send + Sync {
    fn descriptor(&self) -> ExtractorDescriptor;

    fn embedding_dim(&self) -> usize {
        self.descriptor().embedding_dim
    }

    fn embed(
        &self,
        frame: &DynamicImage,
    ) -> Result<Array1<f32>, Box<dyn std::error::Error + Send + Sync>>;
}
