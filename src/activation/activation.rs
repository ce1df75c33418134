use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    #[default]
    Identity,
    /// Softmax is a vector-valued activation; it is applied per output row
    /// by `apply_rows`, never element-wise.
    Softmax,
    Tanh,
    LeakyReLU { alpha: f32 },
    Elu { alpha: f32 },
    Gelu,
    Swish,
}

impl ActivationFunction {
    /// Element-wise activation. `Softmax` is handled by `apply_rows`.
    pub fn function(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity | ActivationFunction::Softmax => x,
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (x.exp() - 1.0) }
            }
            ActivationFunction::Gelu => {
                let c = (2.0_f32 / PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044715 * x.powi(3))).tanh())
            }
            ActivationFunction::Swish => x / (1.0 + (-x).exp()),
        }
    }

    /// Applies the activation in place to a buffer made of rows of `row_len`
    /// values. Softmax normalizes each row independently; every other
    /// variant is element-wise.
    pub fn apply_rows(&self, data: &mut [f32], row_len: usize) {
        match self {
            ActivationFunction::Identity => {}
            ActivationFunction::Softmax => {
                if row_len == 0 {
                    return;
                }
                for row in data.chunks_mut(row_len) {
                    softmax_in_place(row);
                }
            }
            _ => {
                for x in data.iter_mut() {
                    *x = self.function(*x);
                }
            }
        }
    }
}

/// Numerically stable softmax (max-subtracted).
fn softmax_in_place(row: &mut [f32]) {
    let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for x in row.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    if sum > 0.0 {
        for x in row.iter_mut() {
            *x /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_and_leaky() {
        assert_eq!(ActivationFunction::ReLU.function(-2.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.function(3.0), 3.0);
        assert_eq!(ActivationFunction::LeakyReLU { alpha: 0.1 }.function(-2.0), -0.2);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let mut data = vec![1.0, 2.0, 3.0, 1000.0, 1000.0, 1000.0];
        ActivationFunction::Softmax.apply_rows(&mut data, 3);
        let first: f32 = data[..3].iter().sum();
        let second: f32 = data[3..].iter().sum();
        assert!((first - 1.0).abs() < 1e-5);
        assert!((second - 1.0).abs() < 1e-5);
        assert!(data[2] > data[1] && data[1] > data[0]);
        assert!((data[3] - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ActivationFunction::ReLU).unwrap();
        assert_eq!(json, "\"ReLU\"");
        let leaky: ActivationFunction =
            serde_json::from_str(r#"{"LeakyReLU":{"alpha":0.2}}"#).unwrap();
        assert_eq!(leaky, ActivationFunction::LeakyReLU { alpha: 0.2 });
    }
}
