//! Model Loader: resolves the packaged artifacts for a plant and builds a
//! ready-to-run [`Network`].
//!
//! Artifacts live under `<root>/<Plant>/model.json` plus the weight shards
//! named in its manifest (normally `group1-shard1of1.bin`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::error::LoadError;
use crate::network::{ModelDescriptor, Network};
use crate::plant::Plant;

/// File name of the architecture descriptor inside a plant directory.
pub const DESCRIPTOR_FILE: &str = "model.json";

/// Source of model handles. The predict workflow only depends on this trait
/// so tests and alternative asset stores can stand in for the filesystem.
pub trait ModelSource: Send + Sync {
    /// Loads the model for `plant`, or `None` when no prediction is possible.
    /// Failures are logged, never propagated.
    fn load(&self, plant: Plant) -> Option<Arc<Network>>;
}

/// Filesystem-backed model store.
#[derive(Debug)]
pub struct ModelStore {
    root: PathBuf,
    cache: Option<Mutex<HashMap<Plant, Arc<Network>>>>,
}

impl ModelStore {
    /// Store that reloads the artifacts on every call.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ModelStore { root: root.into(), cache: None }
    }

    /// Store that keeps each successfully loaded network for reuse.
    pub fn cached(root: impl Into<PathBuf>) -> Self {
        ModelStore { root: root.into(), cache: Some(Mutex::new(HashMap::new())) }
    }

    /// Directory holding the artifacts for `plant`.
    pub fn plant_dir(&self, plant: Plant) -> PathBuf {
        self.root.join(plant.as_str())
    }

    /// Path of the descriptor for `plant`.
    pub fn descriptor_path(&self, plant: Plant) -> PathBuf {
        self.plant_dir(plant).join(DESCRIPTOR_FILE)
    }

    /// Reads and parses the descriptor for `plant`.
    pub fn read_descriptor(&self, plant: Plant) -> Result<ModelDescriptor, LoadError> {
        let path = self.descriptor_path(plant);
        let text = std::fs::read(&path)
            .map_err(|source| LoadError::MissingArtifact { path: path.clone(), source })?;
        serde_json::from_slice(&text).map_err(|source| LoadError::MalformedDescriptor { path, source })
    }

    /// Loads the model for `plant`, reporting why it failed.
    pub fn try_load(&self, plant: Plant) -> Result<Network, LoadError> {
        let descriptor = self.read_descriptor(plant)?;
        let dir = self.plant_dir(plant);

        let mut payload = Vec::new();
        for shard in descriptor.shard_paths() {
            let path = dir.join(shard);
            let bytes = std::fs::read(&path)
                .map_err(|source| LoadError::MissingArtifact { path, source })?;
            payload.extend_from_slice(&bytes);
        }

        let network = Network::from_artifacts(&descriptor, &payload)?;
        info!(plant = %plant, layers = network.layers.len(), "model loaded");
        Ok(network)
    }
}

impl ModelSource for ModelStore {
    fn load(&self, plant: Plant) -> Option<Arc<Network>> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().ok().and_then(|c| c.get(&plant).cloned()) {
                return Some(hit);
            }
        }

        match self.try_load(plant) {
            Ok(network) => {
                let network = Arc::new(network);
                if let Some(cache) = &self.cache {
                    if let Ok(mut c) = cache.lock() {
                        c.insert(plant, network.clone());
                    }
                }
                Some(network)
            }
            Err(e) => {
                error!(plant = %plant, error = %e, "Error occurred while loading the model");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::write_demo_model;
    use std::path::Path;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_load_written_model() {
        let dir = tempfile::tempdir().unwrap();
        write_demo_model(dir.path(), Plant::Potato, 32, &mut StdRng::seed_from_u64(1)).unwrap();
        let store = ModelStore::new(dir.path());
        let net = store.load(Plant::Potato).expect("model should load");
        assert_eq!(net.input_shape, [32, 32, 3]);
        assert_eq!(net.output_shape(), [1, 1, 3]);
    }

    #[test]
    fn test_missing_model_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(store.load(Plant::Tomato).is_none());
        assert!(matches!(store.try_load(Plant::Tomato), Err(LoadError::MissingArtifact { .. })));
    }

    #[test]
    fn test_missing_weights_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        write_demo_model(dir.path(), Plant::Cotton, 16, &mut StdRng::seed_from_u64(2)).unwrap();
        std::fs::remove_file(dir.path().join("Cotton").join("group1-shard1of1.bin")).unwrap();
        let store = ModelStore::new(dir.path());
        assert!(store.load(Plant::Cotton).is_none());
    }

    #[test]
    fn test_malformed_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Tomato")).unwrap();
        std::fs::write(dir.path().join("Tomato").join(DESCRIPTOR_FILE), "{not json").unwrap();
        let store = ModelStore::new(dir.path());
        assert!(matches!(store.try_load(Plant::Tomato), Err(LoadError::MalformedDescriptor { .. })));
        assert!(store.load(Plant::Tomato).is_none());
    }

    fn write_descriptor(root: &Path, plant: Plant, json: &str, shard: &[u8]) {
        let dir = root.join(plant.as_str());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(DESCRIPTOR_FILE), json).unwrap();
        std::fs::write(dir.join("group1-shard1of1.bin"), shard).unwrap();
    }

    #[test]
    fn test_oversized_shapes_return_none() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(
            dir.path(),
            Plant::Tomato,
            r#"{
                "modelTopology": {"inputShape": [4294967296, 4294967296, 2], "layers": [{"type": "Flatten"}]},
                "weightsManifest": [{"paths": ["group1-shard1of1.bin"], "weights": []}]
            }"#,
            &[],
        );
        write_descriptor(
            dir.path(),
            Plant::Potato,
            r#"{
                "modelTopology": {"inputShape": [2, 2, 1], "layers": [{"type": "Flatten"}]},
                "weightsManifest": [{"paths": ["group1-shard1of1.bin"],
                                     "weights": [{"name": "k", "shape": [4611686018427387904]}]}]
            }"#,
            &[0u8; 4],
        );

        let store = ModelStore::new(dir.path());
        assert!(matches!(store.try_load(Plant::Tomato), Err(LoadError::InvalidTopology(_))));
        assert!(matches!(store.try_load(Plant::Potato), Err(LoadError::InvalidTopology(_))));
        assert!(store.load(Plant::Tomato).is_none());
        assert!(store.load(Plant::Potato).is_none());
    }

    #[test]
    fn test_cached_store_reuses_handle() {
        let dir = tempfile::tempdir().unwrap();
        write_demo_model(dir.path(), Plant::Tomato, 16, &mut StdRng::seed_from_u64(3)).unwrap();
        let store = ModelStore::cached(dir.path());
        let a = store.load(Plant::Tomato).unwrap();
        let b = store.load(Plant::Tomato).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let uncached = ModelStore::new(dir.path());
        let c = uncached.load(Plant::Tomato).unwrap();
        let d = uncached.load(Plant::Tomato).unwrap();
        assert!(!Arc::ptr_eq(&c, &d));
    }
}
