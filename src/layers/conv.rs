use serde::{Serialize, Deserialize};

use crate::{math::tensor::Tensor, activation::activation::ActivationFunction};

/// Spatial padding mode, with Keras semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    #[default]
    Valid,
    Same,
}

/// Output length and leading pad for one spatial axis of a sliding window.
/// Returns `None` when a `Valid` window does not fit or `stride` is zero.
pub fn window_output(input: usize, kernel: usize, stride: usize, padding: Padding) -> Option<(usize, usize)> {
    if stride == 0 || kernel == 0 {
        return None;
    }
    match padding {
        Padding::Valid => {
            if input < kernel {
                return None;
            }
            Some(((input - kernel) / stride + 1, 0))
        }
        Padding::Same => {
            if input == 0 {
                return None;
            }
            let out = (input - 1) / stride + 1;
            let total = (out - 1).checked_mul(stride)?.checked_add(kernel)?.saturating_sub(input);
            Some((out, total / 2))
        }
    }
}

/// 2-D convolution over NHWC input. The kernel is stored flat in
/// `[kh, kw, in_channels, filters]` order.
#[derive(Debug, Clone)]
pub struct Conv2d {
    pub kernel_size: [usize; 2],
    pub strides: [usize; 2],
    pub padding: Padding,
    pub in_channels: usize,
    pub filters: usize,
    pub kernel: Vec<f32>,
    pub biases: Vec<f32>,
    pub activator: ActivationFunction,
}

impl Conv2d {
    /// Output `[h, w, filters]` for a given `[h, w, c]` input, if the window fits.
    pub fn output_shape(&self, input: [usize; 3]) -> Option<[usize; 3]> {
        let (oh, _) = window_output(input[0], self.kernel_size[0], self.strides[0], self.padding)?;
        let (ow, _) = window_output(input[1], self.kernel_size[1], self.strides[1], self.padding)?;
        Some([oh, ow, self.filters])
    }

    pub fn feed_from(&self, input: Tensor) -> Tensor {
        let [n, h, w, c] = input.shape();
        let [kh, kw] = self.kernel_size;
        let [sh, sw] = self.strides;
        // Shapes are validated when the network is built.
        let (oh, pad_top) = window_output(h, kh, sh, self.padding).unwrap_or((0, 0));
        let (ow, pad_left) = window_output(w, kw, sw, self.padding).unwrap_or((0, 0));
        let filters = self.filters;

        let mut out = Tensor::zeros([n, oh, ow, filters]);
        let src = input.data();

        for b in 0..n {
            for oy in 0..oh {
                for ox in 0..ow {
                    let base = ((b * oh + oy) * ow + ox) * filters;
                    let acc = &mut out.data_mut()[base..base + filters];
                    if !self.biases.is_empty() {
                        acc.copy_from_slice(&self.biases);
                    }
                    for ky in 0..kh {
                        let iy = (oy * sh + ky) as isize - pad_top as isize;
                        if iy < 0 || iy >= h as isize {
                            continue;
                        }
                        for kx in 0..kw {
                            let ix = (ox * sw + kx) as isize - pad_left as isize;
                            if ix < 0 || ix >= w as isize {
                                continue;
                            }
                            let pixel = ((b * h + iy as usize) * w + ix as usize) * c;
                            for ci in 0..c {
                                let v = src[pixel + ci];
                                if v == 0.0 {
                                    continue;
                                }
                                let k = ((ky * kw + kx) * c + ci) * filters;
                                for (a, wgt) in acc.iter_mut().zip(&self.kernel[k..k + filters]) {
                                    *a += v * wgt;
                                }
                            }
                        }
                    }
                }
            }
        }

        self.activator.apply_rows(out.data_mut(), filters);
        out
    }
}
