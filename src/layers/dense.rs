use crate::{math::matrix::Matrix, math::tensor::Tensor, activation::activation::ActivationFunction};

/// Fully-connected layer. Consumes any `[n, h, w, c]` tensor as an
/// `(n, h * w * c)` matrix and produces `[n, 1, 1, units]`.
#[derive(Debug, Clone)]
pub struct Dense {
    pub units: usize,
    /// Kernel of shape `(inputs, units)`.
    pub weights: Matrix,
    pub biases: Vec<f32>,
    pub activator: ActivationFunction,
}

impl Dense {
    pub fn new(weights: Matrix, biases: Vec<f32>, activation: ActivationFunction) -> Dense {
        Dense { units: weights.cols, weights, biases, activator: activation }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn feed_from(&self, input: Tensor) -> Tensor {
        let n = input.batch();
        let features = input.sample_len();
        let x = Matrix { rows: n, cols: features, data: input.into_vec() };

        let mut z = &x * &self.weights;
        if !self.biases.is_empty() {
            z.add_row_broadcast(&self.biases);
        }
        self.activator.apply_rows(&mut z.data, self.units);

        Tensor::from_parts([n, 1, 1, self.units], z.data)
    }
}
