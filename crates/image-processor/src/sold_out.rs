//! "Sold out" product image: grayscale subject over a blurred backdrop,
//! stamped with a watermark in the bottom-right corner.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::compose::paste_masked;
use crate::enhance::{gaussian_blur, luma};
use crate::{ProcessError, Result};

/// Sold-out composition settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SoldOutOptions {
    /// Gaussian blur radius for the backdrop.
    pub blur_radius: f32,
    /// Distance in pixels between the watermark and the right/bottom edges.
    pub margin: u32,
}

impl Default for SoldOutOptions {
    fn default() -> Self {
        Self {
            blur_radius: 20.0,
            margin: 20,
        }
    }
}

/// Compose a sold-out image.
///
/// `cutout` is the product with its background removed (transparent), the
/// same size as `product`. The blurred product forms the backdrop, the
/// cutout is pasted back sharp, the result is desaturated, and `watermark`
/// is pasted with its own alpha at the bottom-right corner.
pub fn sold_out(
    product: &DynamicImage,
    cutout: &DynamicImage,
    watermark: &DynamicImage,
    options: &SoldOutOptions,
) -> Result<RgbaImage> {
    let (width, height) = (product.width(), product.height());
    if (cutout.width(), cutout.height()) != (width, height) {
        return Err(ProcessError::DimensionMismatch {
            expected: (width, height),
            actual: (cutout.width(), cutout.height()),
        });
    }
    if !options.blur_radius.is_finite() || options.blur_radius < 0.0 {
        return Err(ProcessError::InvalidParameter {
            name: "blur_radius",
            reason: format!("must be a non-negative number, got {}", options.blur_radius),
        });
    }

    let backdrop = gaussian_blur(&product.to_rgb8(), options.blur_radius);
    let mut canvas = DynamicImage::ImageRgb8(backdrop).to_rgba8();
    paste_masked(&mut canvas, &cutout.to_rgba8(), 0, 0);

    let mut result = desaturate(&canvas);

    let watermark = watermark.to_rgba8();
    let x = i64::from(width) - i64::from(watermark.width()) - i64::from(options.margin);
    let y = i64::from(height) - i64::from(watermark.height()) - i64::from(options.margin);
    debug!(x, y, "Placing watermark");
    paste_masked(&mut result, &watermark, x, y);

    info!(width, height, "Sold-out image composed");
    Ok(result)
}

/// Grayscale with full opacity.
fn desaturate(img: &RgbaImage) -> RgbaImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        let l = luma(pixel[0], pixel[1], pixel[2]);
        *pixel = Rgba([l, l, l, 255]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn product(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        }))
    }

    fn cutout_square(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for y in 0..10 {
            for x in 0..10 {
                img.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    fn watermark(size: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255])))
    }

    #[test]
    fn output_is_gray_and_same_size() {
        let options = SoldOutOptions {
            blur_radius: 3.0,
            margin: 5,
        };
        let result = sold_out(&product(60, 40), &cutout_square(60, 40), &watermark(8), &options).unwrap();

        assert_eq!(result.dimensions(), (60, 40));
        for (x, y, p) in result.enumerate_pixels() {
            assert_eq!(p[0], p[1], "pixel ({x}, {y}) is not gray");
            assert_eq!(p[1], p[2], "pixel ({x}, {y}) is not gray");
        }
    }

    #[test]
    fn cutout_stays_sharp() {
        let result = sold_out(
            &product(60, 40),
            &cutout_square(60, 40),
            &watermark(8),
            &SoldOutOptions::default(),
        )
        .unwrap();
        let green = luma(0, 255, 0);
        assert_eq!(result.get_pixel(0, 0).0, [green, green, green, 255]);
        assert_eq!(result.get_pixel(9, 9).0, [green, green, green, 255]);
    }

    #[test]
    fn watermark_lands_bottom_right_with_margin() {
        let options = SoldOutOptions {
            blur_radius: 0.0,
            margin: 5,
        };
        let result = sold_out(&product(60, 40), &cutout_square(60, 40), &watermark(8), &options).unwrap();

        // watermark covers x in 47..55, y in 27..35
        assert_eq!(result.get_pixel(47, 27).0, [255, 255, 255, 255]);
        assert_eq!(result.get_pixel(54, 34).0, [255, 255, 255, 255]);
        let blue = luma(0, 0, 255);
        assert_eq!(result.get_pixel(55, 35).0, [blue, blue, blue, 255]);
    }

    #[test]
    fn oversized_watermark_is_clipped() {
        let result = sold_out(
            &product(20, 20),
            &cutout_square(20, 20),
            &watermark(50),
            &SoldOutOptions::default(),
        )
        .unwrap();
        assert_eq!(result.dimensions(), (20, 20));
    }

    #[test]
    fn mismatched_cutout_is_rejected() {
        let result = sold_out(
            &product(20, 20),
            &cutout_square(21, 20),
            &watermark(5),
            &SoldOutOptions::default(),
        );
        assert!(matches!(result, Err(ProcessError::DimensionMismatch { .. })));
    }
}
