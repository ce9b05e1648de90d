use crate::exporter::interface::{ModelArtifact, ModelStore};
use crate::library::logger::interface::Logger;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One pretty-printed JSON file per model: `<dir>/<name>.json`.
pub struct ModelStoreFile {
    dir: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelStoreFile {
    pub fn new(dir: impl Into<PathBuf>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            dir: dir.into(),
            logger: logger.with_namespace("store").with_namespace("file"),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ModelStore for ModelStoreFile {
    fn save(
        &self,
        name: &str,
        artifact: &ModelArtifact,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(name);
        let staging = self.dir.join(format!(".{}.json.tmp", name));
        let json = serde_json::to_string_pretty(artifact)?;

        if let Err(error) = fs::write(&staging, json).and_then(|()| fs::rename(&staging, &path)) {
            let _ = fs::remove_file(&staging);
            return Err(error.into());
        }

        let _ = self
            .logger
            .info(&format!("Saved model {:?} to {}", name, path.display()));
        Ok(())
    }

    fn load(&self, name: &str) -> Result<ModelArtifact, Box<dyn std::error::Error + Send + Sync>> {
        let path = self.path_for(name);
        let json = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Ok(serde_json::from_str(&json)?)
    }
}
