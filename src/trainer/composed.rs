use crate::classifier_head::{ClassifierHead, Prediction};
use crate::error::SessionError;
use crate::feature_extractor::interface::FeatureExtractor;
use image::DynamicImage;
use ndarray::Array1;
use std::sync::Arc;

/// Feature extractor followed by classifier head: frame in, class
/// probabilities out.
#[derive(Clone)]
pub struct ComposedModel {
    extractor: Arc<dyn FeatureExtractor + Send + Sync>,
    head: ClassifierHead,
    class_names: Vec<String>,
}

impl ComposedModel {
    pub fn new(
        extractor: Arc<dyn FeatureExtractor + Send + Sync>,
        head: ClassifierHead,
        class_names: Vec<String>,
    ) -> Result<Self, SessionError> {
        if extractor.embedding_dim() != head.embedding_dim() {
            return Err(SessionError::ShapeMismatch {
                expected: vec![head.embedding_dim()],
                got: vec![extractor.embedding_dim()],
            });
        }
        if class_names.len() != head.num_classes() {
            return Err(SessionError::ShapeMismatch {
                expected: vec![head.num_classes()],
                got: vec![class_names.len()],
            });
        }
        Ok(Self {
            extractor,
            head,
            class_names,
        })
    }

    pub fn predict(&self, frame: &DynamicImage) -> Result<Array1<f32>, SessionError> {
        let embedding = self.extractor.embed(frame).map_err(SessionError::Extract)?;
        self.head.predict(&embedding.view())
    }

    pub fn classify(&self, frame: &DynamicImage) -> Result<Option<Prediction>, SessionError> {
        let probabilities = self.predict(frame)?;
        Ok(Prediction::from_probabilities(
            probabilities.view(),
            &self.class_names,
        ))
    }

    pub fn extractor(&self) -> &Arc<dyn FeatureExtractor + Send + Sync> {
        &self.extractor
    }

    pub fn head(&self) -> &ClassifierHead {
        &self.head
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn summary(&self) -> String {
        let descriptor = self.extractor.descriptor();
        format!(
            "{} ({}x{} -> {}) -> {}",
            descriptor.name,
            descriptor.input_shape.0,
            descriptor.input_shape.1,
            descriptor.embedding_dim,
            self.head.summary()
        )
    }
}
