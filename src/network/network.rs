use tracing::debug;

use crate::error::{LoadError, PredictError};
use crate::layers::{Layer, LayerSpec};
use crate::math::tensor::{volume, Tensor};
use crate::network::metadata::ModelMetadata;
use crate::network::spec::{ModelDescriptor, WeightSpec};
use crate::network::weights::decode_weights;

/// A loaded, ready-to-run sequential network (the model handle).
#[derive(Debug, Clone)]
pub struct Network {
    pub name: String,
    /// `[height, width, channels]` of one input sample.
    pub input_shape: [usize; 3],
    pub layers: Vec<Layer>,
    /// Specs the layers were built from, kept for summaries.
    pub specs: Vec<LayerSpec>,
    pub metadata: ModelMetadata,
}

impl Network {
    /// Combines an architecture descriptor with its weight payload.
    ///
    /// Every layer is checked against the shape flowing into it, and the
    /// manifest must provide exactly the weight tensors the layers consume.
    pub fn from_artifacts(descriptor: &ModelDescriptor, payload: &[u8]) -> Result<Network, LoadError> {
        let topology = &descriptor.model_topology;
        if topology.input_shape.iter().any(|&d| d == 0) {
            return Err(LoadError::InvalidTopology(format!(
                "input shape {:?} has a zero dimension",
                topology.input_shape
            )));
        }
        if volume(&topology.input_shape).is_none() {
            return Err(LoadError::InvalidTopology(format!(
                "input shape {:?} is too large",
                topology.input_shape
            )));
        }

        let specs: Vec<&WeightSpec> = descriptor.weight_specs().collect();
        let mut tensors = decode_weights(&specs, payload)?.into_iter();
        let mut cursor = 0;

        let mut shape = topology.input_shape;
        let mut layers = Vec::with_capacity(topology.layers.len());

        for (index, layer_spec) in topology.layers.iter().enumerate() {
            let wanted = layer_spec.weight_shapes(shape);
            if cursor + wanted.len() > specs.len() {
                return Err(LoadError::WeightCount {
                    layer: index,
                    expected: wanted.len(),
                    actual: specs.len() - cursor,
                });
            }

            let mut weights = Vec::with_capacity(wanted.len());
            for expected in wanted {
                let spec = specs[cursor];
                if spec.shape != expected {
                    return Err(LoadError::WeightShape {
                        layer: index,
                        name: spec.name.clone(),
                        expected,
                        actual: spec.shape.clone(),
                    });
                }
                weights.extend(tensors.next());
                cursor += 1;
            }

            let (layer, next) = layer_spec.build(index, shape, weights)?;
            debug!(layer = index, kind = layer_spec.kind(), input = ?shape, output = ?next, "built layer");
            layers.push(layer);
            shape = next;
        }

        if cursor != specs.len() {
            return Err(LoadError::InvalidTopology(format!(
                "{} weight tensors are not used by any layer",
                specs.len() - cursor
            )));
        }

        Ok(Network {
            name: topology.name.clone(),
            input_shape: topology.input_shape,
            layers,
            specs: topology.layers.clone(),
            metadata: descriptor.metadata.clone(),
        })
    }

    /// Shape of one output sample.
    pub fn output_shape(&self) -> [usize; 3] {
        self.layers
            .iter()
            .try_fold(self.input_shape, |shape, layer| layer.output_shape(shape))
            .unwrap_or(self.input_shape)
    }

    /// Runs the network on `input` and returns the output values flattened
    /// row-major over `[batch, ...]`.
    pub fn predict(&self, input: Tensor) -> Result<Vec<f32>, PredictError> {
        if self.layers.is_empty() {
            return Err(PredictError::EmptyNetwork);
        }
        if input.sample_shape() != self.input_shape {
            return Err(PredictError::ShapeMismatch {
                expected: self.input_shape,
                actual: input.sample_shape(),
            });
        }
        if input.batch() == 0 {
            return Err(PredictError::EmptyBatch);
        }

        let output = self.layers.iter().fold(input, |current, layer| layer.feed_from(current));
        Ok(output.into_vec())
    }

    /// One line per layer, e.g. `Conv2D [224, 224, 3] -> [222, 222, 8]`.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("{} input {:?}", self.name, self.input_shape)];
        let mut shape = self.input_shape;
        for (spec, layer) in self.specs.iter().zip(&self.layers) {
            let next = layer.output_shape(shape).unwrap_or(shape);
            lines.push(format!("  {:<24} {:?} -> {:?}", spec.kind(), shape, next));
            shape = next;
        }
        lines.join("\n")
    }
}
