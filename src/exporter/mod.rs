#[cfg(test)]
pub mod impl_fake;
pub mod impl_file;
pub mod interface;

use crate::error::SessionError;
use crate::exporter::interface::{ModelArtifact, ModelStore};
use crate::library::logger::interface::Logger;
use crate::trainer::ComposedModel;
use std::sync::Arc;

pub struct Exporter {
    store: Arc<dyn ModelStore + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Exporter {
    pub fn new(store: Arc<dyn ModelStore + Send + Sync>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            store,
            logger: logger.with_namespace("exporter"),
        }
    }

    pub fn save(&self, name: &str, model: &ComposedModel) -> Result<ModelArtifact, SessionError> {
        validate_model_name(name)?;

        let artifact = ModelArtifact {
            name: name.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            class_names: model.class_names().to_vec(),
            extractor: model.extractor().descriptor(),
            head: model.head().weights(),
        };

        self.store
            .save(name, &artifact)
            .map_err(SessionError::Export)?;
        let _ = self.logger.info(&format!("Exported model {:?}", name));

        Ok(artifact)
    }
}

/// Names become store keys (and file names), so path syntax is refused.
pub fn validate_model_name(name: &str) -> Result<(), SessionError> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SessionError::InvalidModelName(name.to_string()));
    }
    Ok(())
}
