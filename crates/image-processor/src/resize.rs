//! Image resizing utilities.
//!
//! Provides uniform scaling with Lanczos3 filtering and trimming to a
//! block-size multiple for pixel-art conversion.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::{ProcessError, Result};

/// Scale an image uniformly by `scale`.
///
/// Target dimensions are truncated and kept at least 1px.
/// Uses Lanczos3 filtering. A scale that keeps the size returns a copy.
pub fn scale_by(img: &DynamicImage, scale: f64) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());
    let new_width = ((f64::from(orig_w) * scale) as u32).max(1);
    let new_height = ((f64::from(orig_h) * scale) as u32).max(1);

    if (new_width, new_height) == (orig_w, orig_h) {
        debug!(scale, "Scale keeps dimensions, skipping resize");
        return img.clone();
    }

    debug!(
        orig_w,
        orig_h, new_width, new_height, scale, "Scaling image"
    );

    img.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Resize an image so both dimensions are multiples of `block`.
///
/// Dimensions are rounded down to the nearest multiple; the image is
/// resampled (Catmull-Rom) rather than cropped.
pub fn trim_to_multiple(img: &DynamicImage, block: u32) -> Result<DynamicImage> {
    if block == 0 {
        return Err(ProcessError::InvalidParameter {
            name: "pixel_size",
            reason: "must be at least 1".into(),
        });
    }

    let (orig_w, orig_h) = (img.width(), img.height());
    let new_width = orig_w - orig_w % block;
    let new_height = orig_h - orig_h % block;

    if new_width == 0 || new_height == 0 {
        return Err(ProcessError::TooSmall {
            width: orig_w,
            height: orig_h,
        });
    }

    if (new_width, new_height) == (orig_w, orig_h) {
        return Ok(img.clone());
    }

    debug!(
        orig_w,
        orig_h, new_width, new_height, block, "Trimming image to block multiple"
    );

    Ok(img.resize_exact(new_width, new_height, FilterType::CatmullRom))
}
