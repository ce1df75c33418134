//! Fitting an arbitrary image onto a fixed square canvas.

use image::{imageops, imageops::FilterType, DynamicImage, Rgb, RgbImage, Rgba};

use crate::error::PreprocessError;

/// Where the (possibly scaled) source lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Computes the placement of a `width × height` source on a `target × target`
/// canvas.
///
/// The source is scaled down, aspect ratio preserved, only when one of its
/// sides exceeds `target`; smaller images keep their size. Either way the
/// result is centered.
pub fn placement(width: u32, height: u32, target: u32) -> Result<Placement, PreprocessError> {
    if width == 0 || height == 0 {
        return Err(PreprocessError::DegenerateImage { width, height });
    }
    if target == 0 {
        return Err(PreprocessError::ZeroTarget);
    }

    let (mut w, mut h) = (width as f64, height as f64);
    let t = target as f64;
    if width > target || height > target {
        let aspect = w / h;
        if w / t > h / t {
            w = t;
            h = t / aspect;
        } else {
            h = t;
            w = t * aspect;
        }
    }

    let w = (w.round() as u32).clamp(1, target);
    let h = (h.round() as u32).clamp(1, target);
    Ok(Placement { x: (target - w) / 2, y: (target - h) / 2, width: w, height: h })
}

/// RGB view of `image` with any alpha composited onto black.
pub fn over_black(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let scale = |v: u8| ((v as u16 * a as u16 + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

/// Draws `image` centered on a black `target × target` RGB canvas.
pub fn letterbox(image: &DynamicImage, target: u32) -> Result<RgbImage, PreprocessError> {
    let place = placement(image.width(), image.height(), target)?;

    let flat = over_black(image);
    let source = if (place.width, place.height) == flat.dimensions() {
        flat
    } else {
        imageops::resize(&flat, place.width, place.height, FilterType::Lanczos3)
    };

    let mut canvas = RgbImage::new(target, target);
    imageops::replace(&mut canvas, &source, place.x as i64, place.y as i64);
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_landscape_is_scaled_to_width() {
        let p = placement(500, 300, 224).unwrap();
        assert_eq!(p, Placement { x: 0, y: 45, width: 224, height: 134 });
    }

    #[test]
    fn test_portrait_is_scaled_to_height() {
        let p = placement(300, 600, 224).unwrap();
        assert_eq!(p, Placement { x: 56, y: 0, width: 112, height: 224 });
    }

    #[test]
    fn test_small_image_is_centered_unscaled() {
        let p = placement(100, 50, 224).unwrap();
        assert_eq!(p, Placement { x: 62, y: 87, width: 100, height: 50 });
    }

    #[test]
    fn test_one_side_over_target_scales() {
        // 300 wide but short: width wins even though height is small.
        let p = placement(300, 10, 224).unwrap();
        assert_eq!(p.width, 224);
        assert_eq!(p.height, 7);
    }

    #[test]
    fn test_exact_target_fills_canvas() {
        let p = placement(224, 224, 224).unwrap();
        assert_eq!(p, Placement { x: 0, y: 0, width: 224, height: 224 });
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert!(matches!(
            placement(0, 10, 224),
            Err(PreprocessError::DegenerateImage { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_transparency_composites_onto_black() {
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([250, 120, 30, 0]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        img.put_pixel(2, 0, Rgba([200, 100, 50, 128]));
        let flat = over_black(&DynamicImage::ImageRgba8(img.clone()));
        assert_eq!(flat.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([200, 100, 50]));
        assert_eq!(flat.get_pixel(2, 0), &Rgb([100, 50, 25]));

        let canvas = letterbox(&DynamicImage::ImageRgba8(img), 224).unwrap();
        assert_eq!(canvas.get_pixel(110, 111), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(111, 111), &Rgb([200, 100, 50]));
    }

    #[test]
    fn test_letterbox_pads_with_black() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(500, 300, Rgb([255, 255, 255])));
        let canvas = letterbox(&white, 224).unwrap();
        assert_eq!(canvas.dimensions(), (224, 224));
        assert_eq!(canvas.get_pixel(112, 0), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(112, 223), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(112, 112), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_letterbox_small_image_keeps_pixels() {
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 4, Rgb([200, 10, 10])));
        let canvas = letterbox(&red, 224).unwrap();
        assert_eq!(canvas.dimensions(), (224, 224));
        // placed at (107, 110)
        assert_eq!(canvas.get_pixel(107, 110), &Rgb([200, 10, 10]));
        assert_eq!(canvas.get_pixel(116, 113), &Rgb([200, 10, 10]));
        assert_eq!(canvas.get_pixel(106, 110), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(117, 113), &Rgb([0, 0, 0]));
    }
}
