use crate::math::tensor::Tensor;
use crate::layers::conv::{window_output, Padding};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Max,
    Average,
}

/// Windowed max/average pooling with `valid` padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pool2d {
    pub kind: PoolKind,
    pub pool_size: [usize; 2],
    pub strides: [usize; 2],
}

impl Pool2d {
    pub fn output_shape(&self, input: [usize; 3]) -> Option<[usize; 3]> {
        let (oh, _) = window_output(input[0], self.pool_size[0], self.strides[0], Padding::Valid)?;
        let (ow, _) = window_output(input[1], self.pool_size[1], self.strides[1], Padding::Valid)?;
        Some([oh, ow, input[2]])
    }

    pub fn feed_from(&self, input: Tensor) -> Tensor {
        let [n, h, w, c] = input.shape();
        let Some([oh, ow, _]) = self.output_shape([h, w, c]) else {
            return Tensor::zeros([n, 0, 0, c]);
        };
        let [ph, pw] = self.pool_size;
        let [sh, sw] = self.strides;
        let area = (ph * pw) as f32;

        let mut out = Tensor::zeros([n, oh, ow, c]);
        for b in 0..n {
            for oy in 0..oh {
                for ox in 0..ow {
                    for ch in 0..c {
                        let mut acc = match self.kind {
                            PoolKind::Max => f32::NEG_INFINITY,
                            PoolKind::Average => 0.0,
                        };
                        for ky in 0..ph {
                            for kx in 0..pw {
                                let v = input.get(b, oy * sh + ky, ox * sw + kx, ch);
                                match self.kind {
                                    PoolKind::Max => acc = acc.max(v),
                                    PoolKind::Average => acc += v,
                                }
                            }
                        }
                        if self.kind == PoolKind::Average {
                            acc /= area;
                        }
                        let idx = out.index(b, oy, ox, ch);
                        out.data_mut()[idx] = acc;
                    }
                }
            }
        }
        out
    }
}

/// Averages every channel over the full spatial extent: `[n, h, w, c] -> [n, 1, 1, c]`.
pub fn global_average(input: Tensor) -> Tensor {
    let [n, h, w, c] = input.shape();
    let area = (h * w).max(1) as f32;
    let mut out = Tensor::zeros([n, 1, 1, c]);
    for b in 0..n {
        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    out.data_mut()[b * c + ch] += input.get(b, y, x, ch);
                }
            }
        }
    }
    for v in out.data_mut() {
        *v /= area;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tensor {
        Tensor::from_vec([1, 2, 4, 1], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap()
    }

    #[test]
    fn test_max_pool() {
        let pool = Pool2d { kind: PoolKind::Max, pool_size: [2, 2], strides: [2, 2] };
        let out = pool.feed_from(sample());
        assert_eq!(out.shape(), [1, 1, 2, 1]);
        assert_eq!(out.data(), &[6.0, 8.0]);
    }

    #[test]
    fn test_average_pool() {
        let pool = Pool2d { kind: PoolKind::Average, pool_size: [2, 2], strides: [2, 2] };
        let out = pool.feed_from(sample());
        assert_eq!(out.data(), &[3.5, 5.5]);
    }

    #[test]
    fn test_global_average() {
        let out = global_average(sample());
        assert_eq!(out.shape(), [1, 1, 1, 1]);
        assert_eq!(out.data(), &[4.5]);
    }
}
