//! Writes small random-weight models in the packaged artifact layout so the
//! front-ends can run without externally trained assets.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use crate::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::{LayerSpec, Padding};
use crate::loader::DESCRIPTOR_FILE;
use crate::math::matrix::Matrix;
use crate::network::{
    encode_weights, ModelDescriptor, ModelMetadata, ModelTopology, WeightSpec, WeightsGroup,
    DEFAULT_WEIGHTS_FILE,
};
use crate::plant::Plant;

/// Layer stack used for demo models on a `input_size × input_size` RGB input.
pub fn demo_layers(input_size: usize, classes: usize) -> Vec<LayerSpec> {
    let pool = (input_size / 28).max(1);
    vec![
        LayerSpec::Rescaling { scale: 1.0 / 255.0, offset: 0.0 },
        LayerSpec::AveragePooling2D { pool_size: [pool, pool], strides: None },
        LayerSpec::Conv2D {
            filters: 4,
            kernel_size: [3, 3],
            strides: [1, 1],
            padding: Padding::Same,
            activation: ActivationFunction::ReLU,
            use_bias: true,
        },
        LayerSpec::MaxPooling2D { pool_size: [2, 2], strides: None },
        LayerSpec::Flatten,
        LayerSpec::Dense { units: 16, activation: ActivationFunction::ReLU, use_bias: true },
        LayerSpec::Dense { units: classes, activation: ActivationFunction::Softmax, use_bias: true },
    ]
}

/// Writes `<root>/<Plant>/model.json` and its weight shard. Returns the
/// plant directory.
pub fn write_demo_model<R: Rng + ?Sized>(
    root: &Path,
    plant: Plant,
    input_size: usize,
    rng: &mut R,
) -> Result<PathBuf> {
    let labels = plant.default_labels();
    let layers = demo_layers(input_size, labels.len());
    let input_shape = [input_size, input_size, 3];

    let mut shape = input_shape;
    let mut specs = Vec::new();
    let mut tensors: Vec<Vec<f32>> = Vec::new();

    for (index, layer) in layers.iter().enumerate() {
        let wanted = layer.weight_shapes(shape);
        let mut weights = Vec::with_capacity(wanted.len());
        for (slot, dims) in wanted.into_iter().enumerate() {
            let len: usize = dims.iter().product();
            let values = if slot == 0 {
                let fan_in = len / dims.last().copied().unwrap_or(1).max(1);
                Matrix::he(1, len, fan_in, rng).data
            } else {
                vec![0.0; len]
            };
            let suffix = if slot == 0 { "kernel" } else { "bias" };
            specs.push(WeightSpec {
                name: format!("{}_{}/{}", layer.kind().to_lowercase(), index, suffix),
                shape: dims,
                dtype: "float32".into(),
            });
            weights.push(values);
        }
        tensors.extend(weights.iter().cloned());
        let (_, next) = layer.build(index, shape, weights)?;
        shape = next;
    }

    let descriptor = ModelDescriptor {
        format: "layers-model".into(),
        model_topology: ModelTopology {
            name: format!("{}_demo", plant.as_str().to_lowercase()),
            input_shape,
            layers,
        },
        weights_manifest: vec![WeightsGroup { paths: vec![DEFAULT_WEIGHTS_FILE.into()], weights: specs }],
        metadata: ModelMetadata {
            description: Some(format!("Random-weight demo classifier for {} leaves", plant)),
            output_labels: Some(labels.iter().map(|l| l.to_string()).collect()),
        },
    };

    let dir = root.join(plant.as_str());
    std::fs::create_dir_all(&dir)?;
    descriptor.save_json(&dir.join(DESCRIPTOR_FILE))?;
    std::fs::write(dir.join(DEFAULT_WEIGHTS_FILE), encode_weights(tensors.iter().map(Vec::as_slice)))?;
    info!(plant = %plant, dir = %dir.display(), "wrote demo model");
    Ok(dir)
}
