use crate::feature_extractor::image::resize_frame;
use crate::feature_extractor::interface::{ExtractorDescriptor, FeatureExtractor};
use crate::feature_extractor::model_config::ModelConfig;
use image::DynamicImage;
use ndarray::Array1;
use tract_onnx::prelude::*;

/// Frozen ONNX backbone (e.g. MobileNet truncated at its global average
/// pooling layer) taking NHWC frames scaled to `[0, 1]`.
pub struct FeatureExtractorTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
}

impl FeatureExtractorTractOnnx {
    pub fn new(config: ModelConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = config.input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(
                0,
                f32::fact([1, height as usize, width as usize, 3]).into(),
            )?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { model, config })
    }
}

impl FeatureExtractor for FeatureExtractorTractOnnx {
    fn descriptor(&self) -> ExtractorDescriptor {
        ExtractorDescriptor {
            name: self.config.onnx_model_path.clone(),
            embedding_dim: self.config.embedding_dim,
            input_shape: self.config.input_shape,
        }
    }

    fn embed(
        &self,
        frame: &DynamicImage,
    ) -> Result<Array1<f32>, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = self.config.input_shape;
        let rgb = resize_frame(frame, width, height).to_rgb8();

        let input = tract_ndarray::Array4::from_shape_fn(
            (1, height as usize, width as usize, 3),
            |(_, y, x, c)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
        )
        .into_tensor();

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("backbone produced no output")?
            .to_array_view::<f32>()?;

        Ok(output.iter().copied().collect())
    }
}
