/// Number of elements in an array of shape `dims`, or `None` on overflow.
pub fn volume(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Owned 4-D array in NHWC layout (`[batch, height, width, channels]`).
///
/// This is the only tensor type the inference engine moves between layers;
/// Dense layers view it as a `(batch, h * w * c)` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl Tensor {
    pub fn zeros(shape: [usize; 4]) -> Tensor {
        Tensor { shape, data: vec![0.0; shape.iter().product()] }
    }

    /// Wraps a flat NHWC buffer. Returns `None` on a length mismatch.
    pub fn from_vec(shape: [usize; 4], data: Vec<f32>) -> Option<Tensor> {
        if volume(&shape)? != data.len() {
            return None;
        }
        Some(Tensor { shape, data })
    }

    /// Builds a tensor whose length the caller has already established.
    pub(crate) fn from_parts(shape: [usize; 4], data: Vec<f32>) -> Tensor {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Tensor { shape, data }
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn batch(&self) -> usize {
        self.shape[0]
    }

    /// Shape without the batch axis: `[h, w, c]`.
    pub fn sample_shape(&self) -> [usize; 3] {
        [self.shape[1], self.shape[2], self.shape[3]]
    }

    /// Number of scalars in one batch entry.
    pub fn sample_len(&self) -> usize {
        self.shape[1] * self.shape[2] * self.shape[3]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    pub fn index(&self, n: usize, y: usize, x: usize, c: usize) -> usize {
        let [_, h, w, ch] = self.shape;
        ((n * h + y) * w + x) * ch + c
    }

    #[inline]
    pub fn get(&self, n: usize, y: usize, x: usize, c: usize) -> f32 {
        self.data[self.index(n, y, x, c)]
    }

    /// Repeats a single-sample tensor `batch` times along the leading axis.
    ///
    /// # Panics
    /// Panics if `self` already holds more than one sample.
    pub fn tile_batch(&self, batch: usize) -> Tensor {
        assert_eq!(self.shape[0], 1, "tile_batch expects a single sample");
        let mut data = Vec::with_capacity(self.data.len() * batch);
        for _ in 0..batch {
            data.extend_from_slice(&self.data);
        }
        Tensor { shape: [batch, self.shape[1], self.shape[2], self.shape[3]], data }
    }

    /// Reinterprets the tensor as `[n, 1, 1, h * w * c]` without copying.
    pub fn flatten(self) -> Tensor {
        let [n, h, w, c] = self.shape;
        Tensor { shape: [n, 1, 1, h * w * c], data: self.data }
    }
}
