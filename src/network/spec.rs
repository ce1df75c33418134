use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::layers::LayerSpec;
use crate::math::tensor::volume;
use crate::network::metadata::ModelMetadata;

/// Default name of the single weights shard next to `model.json`.
pub const DEFAULT_WEIGHTS_FILE: &str = "group1-shard1of1.bin";

/// Layer stack plus the per-sample input shape it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTopology {
    /// Human-readable name used in logs.
    #[serde(default)]
    pub name: String,
    /// `[height, width, channels]` of one input sample.
    pub input_shape: [usize; 3],
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

/// One tensor inside a weights shard group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    pub name: String,
    pub shape: Vec<usize>,
    #[serde(default = "float32")]
    pub dtype: String,
}

fn float32() -> String { "float32".to_owned() }

impl WeightSpec {
    /// Number of `f32` values in this tensor, or `None` if the shape
    /// overflows.
    pub fn len(&self) -> Option<usize> {
        volume(&self.shape)
    }

    /// Size of this tensor in the payload.
    pub fn byte_len(&self) -> Option<usize> {
        self.len()?.checked_mul(4)
    }
}

/// A group of shard files whose concatenation holds `weights` in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsGroup {
    pub paths: Vec<String>,
    pub weights: Vec<WeightSpec>,
}

/// The architecture descriptor stored as `model.json`.
///
/// Weights live in separate binary shards named by `weights_manifest`, so the
/// descriptor can be inspected without reading the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    #[serde(default = "layers_model")]
    pub format: String,
    pub model_topology: ModelTopology,
    pub weights_manifest: Vec<WeightsGroup>,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

fn layers_model() -> String { "layers-model".to_owned() }

impl ModelDescriptor {
    /// All weight specs across every group, in payload order.
    pub fn weight_specs(&self) -> impl Iterator<Item = &WeightSpec> {
        self.weights_manifest.iter().flat_map(|g| g.weights.iter())
    }

    /// All shard file names across every group, in payload order.
    pub fn shard_paths(&self) -> impl Iterator<Item = &str> {
        self.weights_manifest.iter().flat_map(|g| g.paths.iter().map(String::as_str))
    }

    /// Serializes the descriptor to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
