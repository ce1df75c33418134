use crate::math::tensor::Tensor;

/// `y = x * scale + offset`, element-wise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescaling {
    pub scale: f32,
    pub offset: f32,
}

impl Rescaling {
    pub fn feed_from(&self, mut input: Tensor) -> Tensor {
        for x in input.data_mut() {
            *x = *x * self.scale + self.offset;
        }
        input
    }
}
