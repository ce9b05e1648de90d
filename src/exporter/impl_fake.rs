use crate::exporter::interface::{ModelArtifact, ModelStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct ModelStoreFake {
    models: Mutex<HashMap<String, ModelArtifact>>,
    failing: AtomicBool,
}

impl ModelStoreFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn names(&self) -> Vec<String> {
        let models = match self.models.lock() {
            Ok(models) => models,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut names: Vec<String> = models.keys().cloned().collect();
        names.sort();
        names
    }
}

impl ModelStore for ModelStoreFake {
    fn save(
        &self,
        name: &str,
        artifact: &ModelArtifact,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("store unavailable".into());
        }
        self.models
            .lock()
            .map_err(|_| "store lock poisoned")?
            .insert(name.to_string(), artifact.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<ModelArtifact, Box<dyn std::error::Error + Send + Sync>> {
        self.models
            .lock()
            .map_err(|_| "store lock poisoned")?
            .get(name)
            .cloned()
            .ok_or_else(|| format!("no model named {:?}", name).into())
    }
}
