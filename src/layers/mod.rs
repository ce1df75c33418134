pub mod conv;
pub mod dense;
pub mod pool;
pub mod rescaling;

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::LoadError;
use crate::math::{matrix::Matrix, tensor::{volume, Tensor}};

pub use conv::{Conv2d, Padding};
pub use dense::Dense;
pub use pool::{Pool2d, PoolKind};
pub use rescaling::Rescaling;

fn one_stride() -> [usize; 2] { [1, 1] }
fn yes() -> bool { true }

/// One layer of the architecture descriptor, as stored in `model.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum LayerSpec {
    Rescaling {
        scale: f32,
        #[serde(default)]
        offset: f32,
    },
    Conv2D {
        filters: usize,
        kernel_size: [usize; 2],
        #[serde(default = "one_stride")]
        strides: [usize; 2],
        #[serde(default)]
        padding: Padding,
        #[serde(default)]
        activation: ActivationFunction,
        #[serde(default = "yes")]
        use_bias: bool,
    },
    MaxPooling2D {
        pool_size: [usize; 2],
        #[serde(default)]
        strides: Option<[usize; 2]>,
    },
    AveragePooling2D {
        pool_size: [usize; 2],
        #[serde(default)]
        strides: Option<[usize; 2]>,
    },
    GlobalAveragePooling2D,
    Flatten,
    Dense {
        units: usize,
        #[serde(default)]
        activation: ActivationFunction,
        #[serde(default = "yes")]
        use_bias: bool,
    },
}

impl LayerSpec {
    /// Short name used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSpec::Rescaling { .. } => "Rescaling",
            LayerSpec::Conv2D { .. } => "Conv2D",
            LayerSpec::MaxPooling2D { .. } => "MaxPooling2D",
            LayerSpec::AveragePooling2D { .. } => "AveragePooling2D",
            LayerSpec::GlobalAveragePooling2D => "GlobalAveragePooling2D",
            LayerSpec::Flatten => "Flatten",
            LayerSpec::Dense { .. } => "Dense",
        }
    }

    /// Shapes of the weight tensors this layer consumes from the payload,
    /// in manifest order (kernel first, then bias). `input` must have a
    /// volume that fits in `usize`.
    pub fn weight_shapes(&self, input: [usize; 3]) -> Vec<Vec<usize>> {
        match *self {
            LayerSpec::Conv2D { filters, kernel_size, use_bias, .. } => {
                let mut shapes = vec![vec![kernel_size[0], kernel_size[1], input[2], filters]];
                if use_bias {
                    shapes.push(vec![filters]);
                }
                shapes
            }
            LayerSpec::Dense { units, use_bias, .. } => {
                let mut shapes = vec![vec![volume(&input).unwrap_or(0), units]];
                if use_bias {
                    shapes.push(vec![units]);
                }
                shapes
            }
            _ => Vec::new(),
        }
    }

    /// Materializes the layer for an input of shape `[h, w, c]`, consuming
    /// exactly the tensors reported by `weight_shapes`. Returns the layer
    /// and its output shape.
    pub fn build(
        &self,
        index: usize,
        input: [usize; 3],
        mut weights: Vec<Vec<f32>>,
    ) -> Result<(Layer, [usize; 3]), LoadError> {
        let invalid = |what: String| LoadError::InvalidTopology(format!("layer {} ({}): {}", index, self.kind(), what));

        let layer = match *self {
            LayerSpec::Rescaling { scale, offset } => Layer::Rescaling(Rescaling { scale, offset }),
            LayerSpec::Conv2D { filters, kernel_size, strides, padding, activation, use_bias } => {
                if filters == 0 {
                    return Err(invalid("filters must be at least 1".into()));
                }
                let biases = if use_bias { weights.pop().unwrap_or_default() } else { Vec::new() };
                let kernel = weights.pop().unwrap_or_default();
                Layer::Conv2d(Conv2d {
                    kernel_size,
                    strides,
                    padding,
                    in_channels: input[2],
                    filters,
                    kernel,
                    biases,
                    activator: activation,
                })
            }
            LayerSpec::MaxPooling2D { pool_size, strides } => Layer::Pool(Pool2d {
                kind: PoolKind::Max,
                pool_size,
                strides: strides.unwrap_or(pool_size),
            }),
            LayerSpec::AveragePooling2D { pool_size, strides } => Layer::Pool(Pool2d {
                kind: PoolKind::Average,
                pool_size,
                strides: strides.unwrap_or(pool_size),
            }),
            LayerSpec::GlobalAveragePooling2D => Layer::GlobalAveragePool,
            LayerSpec::Flatten => Layer::Flatten,
            LayerSpec::Dense { units, activation, use_bias } => {
                if units == 0 {
                    return Err(invalid("units must be at least 1".into()));
                }
                let biases = if use_bias { weights.pop().unwrap_or_default() } else { Vec::new() };
                let inputs = volume(&input).ok_or_else(|| invalid(format!("input {:?} is too large", input)))?;
                let kernel = Matrix::from_flat(inputs, units, weights.pop().unwrap_or_default())
                    .ok_or_else(|| invalid("kernel length does not match its shape".into()))?;
                Layer::Dense(Dense::new(kernel, biases, activation))
            }
        };

        let output = layer
            .output_shape(input)
            .ok_or_else(|| invalid(format!("window does not fit input {:?}", input)))?;
        if volume(&output).is_none() {
            return Err(invalid(format!("output {:?} is too large", output)));
        }
        Ok((layer, output))
    }
}

/// An executable layer.
#[derive(Debug, Clone)]
pub enum Layer {
    Rescaling(Rescaling),
    Conv2d(Conv2d),
    Pool(Pool2d),
    GlobalAveragePool,
    Flatten,
    Dense(Dense),
}

impl Layer {
    /// Output `[h, w, c]` for a `[h, w, c]` input, or `None` if it cannot apply.
    pub fn output_shape(&self, input: [usize; 3]) -> Option<[usize; 3]> {
        match self {
            Layer::Rescaling(_) => Some(input),
            Layer::Conv2d(conv) => conv.output_shape(input),
            Layer::Pool(pool) => pool.output_shape(input),
            Layer::GlobalAveragePool => Some([1, 1, input[2]]),
            Layer::Flatten => Some([1, 1, volume(&input)?]),
            Layer::Dense(dense) => (volume(&input)? == dense.input_size()).then_some([1, 1, dense.units]),
        }
    }

    pub fn feed_from(&self, input: Tensor) -> Tensor {
        match self {
            Layer::Rescaling(layer) => layer.feed_from(input),
            Layer::Conv2d(layer) => layer.feed_from(input),
            Layer::Pool(layer) => layer.feed_from(input),
            Layer::GlobalAveragePool => pool::global_average(input),
            Layer::Flatten => input.flatten(),
            Layer::Dense(layer) => layer.feed_from(input),
        }
    }
}
