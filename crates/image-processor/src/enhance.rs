//! Image enhancement operators.
//!
//! Each enhancer blends the input with a "degenerate" version of itself:
//! `out = degenerate + factor * (input - degenerate)`. A factor of 1.0
//! returns the input unchanged, 0.0 returns the degenerate image, and
//! factors above 1.0 extrapolate away from it.

use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use tracing::debug;

type Buffer<P> = ImageBuffer<P, Vec<u8>>;

/// ITU-R 601 luma in 16-bit fixed point, rounded.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (sum >> 16) as u8
}

/// Convert to grayscale using [`luma`].
pub fn to_gray(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([img.get_pixel(x, y).luma_value()])
    })
}

/// Pixel types with a well-defined luma value.
pub trait LumaPixel: Pixel<Subpixel = u8> {
    fn luma_value(&self) -> u8;
}

impl LumaPixel for Rgb<u8> {
    fn luma_value(&self) -> u8 {
        luma(self.0[0], self.0[1], self.0[2])
    }
}

impl LumaPixel for Luma<u8> {
    fn luma_value(&self) -> u8 {
        self.0[0]
    }
}

/// Scale color saturation. The degenerate image is the grayscale version.
pub fn color(img: &RgbImage, factor: f32) -> RgbImage {
    debug!(factor, "Adjusting color saturation");
    let degenerate: Vec<u8> = img
        .pixels()
        .flat_map(|p| {
            let l = p.luma_value();
            [l, l, l]
        })
        .collect();
    blend_with(img, &degenerate, factor)
}

/// Scale brightness. The degenerate image is black.
pub fn brightness<P: Pixel<Subpixel = u8>>(img: &Buffer<P>, factor: f32) -> Buffer<P> {
    debug!(factor, "Adjusting brightness");
    let degenerate = vec![0u8; img.as_raw().len()];
    blend_with(img, &degenerate, factor)
}

/// Scale contrast. The degenerate image is uniform gray at the mean luma.
pub fn contrast<P: LumaPixel>(img: &Buffer<P>, factor: f32) -> Buffer<P> {
    let count = u64::from(img.width()) * u64::from(img.height());
    if count == 0 {
        return img.clone();
    }
    let total: u64 = img.pixels().map(|p| u64::from(p.luma_value())).sum();
    let mean = (total as f64 / count as f64 + 0.5) as u8;
    debug!(factor, mean, "Adjusting contrast");

    let degenerate = vec![mean; img.as_raw().len()];
    blend_with(img, &degenerate, factor)
}

/// Scale sharpness. The degenerate image is a 3x3 smoothing of the input.
pub fn sharpness<P: Pixel<Subpixel = u8>>(img: &Buffer<P>, factor: f32) -> Buffer<P> {
    debug!(factor, "Adjusting sharpness");
    let degenerate = smooth(img);
    blend_with(img, &degenerate, factor)
}

/// Gaussian blur with standard deviation `radius`.
///
/// A non-positive radius returns an unmodified copy.
pub fn gaussian_blur(img: &RgbImage, radius: f32) -> RgbImage {
    if radius <= 0.0 || img.width() == 0 || img.height() == 0 {
        return img.clone();
    }
    debug!(radius, width = img.width(), height = img.height(), "Applying Gaussian blur");
    gaussian_blur_f32(img, radius)
}

fn blend_sample(degenerate: u8, value: u8, factor: f32) -> u8 {
    let d = f32::from(degenerate);
    (d + factor * (f32::from(value) - d)).round().clamp(0.0, 255.0) as u8
}

fn blend_with<P: Pixel<Subpixel = u8>>(img: &Buffer<P>, degenerate: &[u8], factor: f32) -> Buffer<P> {
    let mut out = img.clone();
    for (sample, &d) in out.iter_mut().zip(degenerate) {
        *sample = blend_sample(d, *sample, factor);
    }
    out
}

/// Kernel `[1 1 1; 1 5 1; 1 1 1] / 13`. Border pixels are copied unchanged.
fn smooth<P: Pixel<Subpixel = u8>>(img: &Buffer<P>) -> Vec<u8> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let ch = usize::from(P::CHANNEL_COUNT);
    let src = img.as_raw();
    let mut out = src.clone();
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for c in 0..ch {
                let mut sum = 0u32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        let weight = if kx == 1 && ky == 1 { 5 } else { 1 };
                        let idx = ((y + ky - 1) * w + (x + kx - 1)) * ch + c;
                        sum += weight * u32::from(src[idx]);
                    }
                }
                out[(y * w + x) * ch + c] = ((sum + 6) / 13) as u8;
            }
        }
    }

    out
}
