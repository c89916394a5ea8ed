//! Image composition utilities: content bounds, paste, and alpha compositing.

use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use crate::{ProcessError, Result};

/// Axis-aligned box in pixel coordinates, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Bounding box of all pixels with non-zero alpha.
///
/// A fully transparent image yields the full image box.
pub fn content_bbox(img: &RgbaImage) -> BoundingBox {
    let (width, height) = img.dimensions();
    let mut bbox: Option<BoundingBox> = None;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bbox = Some(match bbox {
            None => BoundingBox {
                left: x,
                top: y,
                right: x + 1,
                bottom: y + 1,
            },
            Some(b) => BoundingBox {
                left: b.left.min(x),
                top: b.top.min(y),
                right: b.right.max(x + 1),
                bottom: b.bottom.max(y + 1),
            },
        });
    }

    bbox.unwrap_or(BoundingBox {
        left: 0,
        top: 0,
        right: width,
        bottom: height,
    })
}

/// Copy `top` onto `base` at (`x`, `y`), replacing pixels including alpha.
///
/// Offsets may be negative; anything outside `base` is clipped.
pub fn paste(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    imageops::replace(base, top, x, y);
}

/// Paste `top` onto `base` at (`x`, `y`) using `top`'s alpha as the mask.
///
/// Every channel of `base`, alpha included, moves toward `top` by the mask
/// weight. Offsets may be negative; anything outside `base` is clipped.
pub fn paste_masked(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + i64::from(dx);
        let target_y = y + i64::from(dy);
        if target_x < 0 || target_y < 0 || target_x >= bw || target_y >= bh {
            continue;
        }
        let mask = pixel[3];
        if mask == 0 {
            continue;
        }
        let (tx, ty) = (target_x as u32, target_y as u32);
        if mask == 255 {
            base.put_pixel(tx, ty, *pixel);
        } else {
            let bg = *base.get_pixel(tx, ty);
            base.put_pixel(tx, ty, blend_pixel(&bg, pixel, mask));
        }
    }
}

/// Porter-Duff "over": `top` composited over `base`. Both must share dimensions.
pub fn alpha_composite(base: &RgbaImage, top: &RgbaImage) -> Result<RgbaImage> {
    if base.dimensions() != top.dimensions() {
        return Err(ProcessError::DimensionMismatch {
            expected: base.dimensions(),
            actual: top.dimensions(),
        });
    }
    debug!(
        width = base.width(),
        height = base.height(),
        "Alpha compositing images"
    );

    let mut result = base.clone();
    for (out, src) in result.pixels_mut().zip(top.pixels()) {
        *out = over(out, src);
    }
    Ok(result)
}

fn over(dst: &Rgba<u8>, src: &Rgba<u8>) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, mask: u8) -> Rgba<u8> {
    let m = u32::from(mask);
    let inv = 255 - m;
    let mix = |i: usize| ((u32::from(fg[i]) * m + u32::from(bg[i]) * inv + 127) / 255) as u8;
    Rgba([mix(0), mix(1), mix(2), mix(3)])
}
