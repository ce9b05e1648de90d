use crate::classifier_head::HeadWeights;
use crate::feature_extractor::interface::ExtractorDescriptor;
use serde::{Deserialize, Serialize};

/// What gets persisted for a composed model: the backbone it expects and
/// the trained head weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub created_at: String,
    pub class_names: Vec<String>,
    pub extractor: ExtractorDescriptor,
    pub head: HeadWeights,
}

/// Persistent store keyed by model name.
pub trait ModelStore: Send + Sync {
    fn save(
        &self,
        name: &str,
        artifact: &ModelArtifact,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn load(&self, name: &str) -> Result<ModelArtifact, Box<dyn std::error::Error + Send + Sync>>;
}
