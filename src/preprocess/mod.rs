//! Image Preprocessor: uploaded bytes → batched NHWC input tensor.

pub mod letterbox;

use image::DynamicImage;
use tracing::debug;

use crate::error::PreprocessError;
use crate::math::tensor::Tensor;

pub use letterbox::{letterbox, placement, Placement};

/// Side of the square canvas every model input is drawn on.
pub const INPUT_SIZE: u32 = 224;
/// Channels of the produced tensor (RGB).
pub const CHANNELS: usize = 3;

/// Turns image bytes into a `[batch, target, target, 3]` tensor of raw pixel
/// intensities (`0.0..=255.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    pub target: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Preprocessor { target: INPUT_SIZE }
    }
}

impl Preprocessor {
    pub fn new(target: u32) -> Self {
        Preprocessor { target }
    }

    /// Decodes `bytes` (PNG/JPEG/BMP/GIF), letterboxes the image and
    /// replicates it `batch_size` times along the batch axis.
    pub fn preprocess(&self, bytes: &[u8], batch_size: usize) -> Result<Tensor, PreprocessError> {
        if batch_size == 0 {
            return Err(PreprocessError::ZeroBatch);
        }
        let image = image::load_from_memory(bytes)?;
        debug!(width = image.width(), height = image.height(), "decoded upload");
        self.preprocess_image(&image, batch_size)
    }

    /// Same as [`Preprocessor::preprocess`] for an already decoded image.
    pub fn preprocess_image(&self, image: &DynamicImage, batch_size: usize) -> Result<Tensor, PreprocessError> {
        if batch_size == 0 {
            return Err(PreprocessError::ZeroBatch);
        }
        let canvas = letterbox(image, self.target)?;
        let side = self.target as usize;
        let pixels: Vec<f32> = canvas.into_raw().into_iter().map(f32::from).collect();
        let single = Tensor::from_parts([1, side, side, CHANNELS], pixels);
        Ok(if batch_size == 1 { single } else { single.tile_batch(batch_size) })
    }
}

/// Preprocesses with the default 224×224 canvas.
pub fn preprocess_image(bytes: &[u8], batch_size: usize) -> Result<Tensor, PreprocessError> {
    Preprocessor::default().preprocess(bytes, batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_output_shape_for_large_image() {
        let tensor = preprocess_image(&png_bytes(500, 300), 4).unwrap();
        assert_eq!(tensor.shape(), [4, 224, 224, 3]);
    }

    #[test]
    fn test_output_shape_for_small_image() {
        let tensor = preprocess_image(&png_bytes(20, 40), 1).unwrap();
        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        // centre holds the source colour, corner is padding
        assert_eq!(
            [tensor.get(0, 112, 112, 0), tensor.get(0, 112, 112, 1), tensor.get(0, 112, 112, 2)],
            [10.0, 20.0, 30.0]
        );
        assert_eq!(tensor.get(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_batch_entries_are_identical() {
        let tensor = preprocess_image(&png_bytes(30, 30), 3).unwrap();
        let len = tensor.sample_len();
        let data = tensor.data();
        assert_eq!(&data[..len], &data[len..2 * len]);
        assert_eq!(&data[..len], &data[2 * len..]);
    }

    #[test]
    fn test_corrupt_bytes_fail_to_decode() {
        let err = preprocess_image(b"definitely not an image", 1).unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }

    #[test]
    fn test_zero_batch_is_rejected() {
        assert!(matches!(preprocess_image(&png_bytes(4, 4), 0), Err(PreprocessError::ZeroBatch)));
    }

    #[test]
    fn test_custom_target() {
        let tensor = Preprocessor::new(32).preprocess(&png_bytes(64, 16), 2).unwrap();
        assert_eq!(tensor.shape(), [2, 32, 32, 3]);
    }
}
