//! Floyd-Steinberg error-diffusion dithering.
//!
//! Provides binary dithering for grayscale images and palette dithering for
//! RGB images. Error distribution pattern:
//! - Right:        7/16
//! - Bottom-left:  3/16
//! - Bottom:       5/16
//! - Bottom-right: 1/16

use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::debug;

use crate::quantize::Palette;

/// Values at or above this become white.
const THRESHOLD: i32 = 128;

/// Dither a grayscale image to pure black and white.
pub fn floyd_steinberg_dither(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "Dithering to black and white");

    // i32 buffer absorbs diffused error beyond the u8 range
    let mut buffer: Vec<i32> = img.iter().map(|&v| i32::from(v)).collect();
    let grid = Grid::new(width, height, 1);

    for y in 0..height {
        for x in 0..width {
            let idx = grid.index(x, y, 0);
            let old_pixel = buffer[idx];
            let new_pixel = if old_pixel >= THRESHOLD { 255 } else { 0 };
            buffer[idx] = new_pixel;
            grid.distribute_error(&mut buffer, x, y, 0, old_pixel - new_pixel);
        }
    }

    let mut output = GrayImage::new(width, height);
    for (out, &val) in output.iter_mut().zip(&buffer) {
        *out = val.clamp(0, 255) as u8;
    }

    output
}

/// Map an RGB image onto `palette`, diffusing each channel's quantization error.
pub fn dither_to_palette(img: &RgbImage, palette: &Palette) -> RgbImage {
    let (width, height) = img.dimensions();
    debug!(width, height, colors = palette.len(), "Dithering onto palette");

    let mut buffer: Vec<i32> = img.iter().map(|&v| i32::from(v)).collect();
    let grid = Grid::new(width, height, 3);
    let mut output = RgbImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let base = grid.index(x, y, 0);
            let wanted = [
                buffer[base].clamp(0, 255),
                buffer[base + 1].clamp(0, 255),
                buffer[base + 2].clamp(0, 255),
            ];
            let chosen = palette.nearest(wanted);
            output.put_pixel(x, y, chosen);

            for c in 0..3 {
                let error = wanted[c] - i32::from(chosen[c]);
                grid.distribute_error(&mut buffer, x, y, c, error);
            }
        }
    }

    output
}

/// Pixel-interleaved buffer geometry.
struct Grid {
    width: u32,
    height: u32,
    channels: usize,
}

impl Grid {
    fn new(width: u32, height: u32, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    fn index(&self, x: u32, y: u32, channel: usize) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels + channel
    }

    /// Distribute quantization error of one channel to neighboring pixels.
    fn distribute_error(&self, buffer: &mut [i32], x: u32, y: u32, channel: usize, error: i32) {
        // Right: 7/16
        if x + 1 < self.width {
            buffer[self.index(x + 1, y, channel)] += error * 7 / 16;
        }
        // Bottom-left: 3/16
        if x > 0 && y + 1 < self.height {
            buffer[self.index(x - 1, y + 1, channel)] += error * 3 / 16;
        }
        // Bottom: 5/16
        if y + 1 < self.height {
            buffer[self.index(x, y + 1, channel)] += error * 5 / 16;
        }
        // Bottom-right: 1/16
        if x + 1 < self.width && y + 1 < self.height {
            buffer[self.index(x + 1, y + 1, channel)] += error / 16;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_from_rows(rows: &[&[u8]]) -> GrayImage {
        GrayImage::from_fn(rows[0].len() as u32, rows.len() as u32, |x, y| {
            Luma([rows[y as usize][x as usize]])
        })
    }

    #[test]
    fn binary_dither_yields_only_black_and_white() {
        let ramp = GrayImage::from_fn(16, 6, |x, y| Luma([(x * 16 + y) as u8]));
        let result = floyd_steinberg_dither(&ramp);
        assert_eq!(result.dimensions(), (16, 6));
        assert!(result.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn binary_dither_keeps_extremes() {
        let white = floyd_steinberg_dither(&GrayImage::from_pixel(4, 4, Luma([255])));
        assert!(white.iter().all(|&v| v == 255));

        let black = floyd_steinberg_dither(&GrayImage::from_pixel(4, 4, Luma([0])));
        assert!(black.iter().all(|&v| v == 0));
    }

    #[test]
    fn binary_dither_matches_hand_computed_grid() {
        let img = gray_from_rows(&[&[100, 150, 200], &[50, 127, 250], &[0, 80, 160]]);
        let result = floyd_steinberg_dither(&img);
        let expected = gray_from_rows(&[&[0, 255, 255], &[0, 255, 255], &[0, 0, 255]]);
        assert_eq!(result, expected);
    }

    #[test]
    fn error_only_flows_forward_on_a_single_row() {
        // 64 + accumulated error never reaches the threshold
        let row = gray_from_rows(&[&[64, 64, 64, 64]]);
        assert!(floyd_steinberg_dither(&row).iter().all(|&v| v == 0));
    }

    #[test]
    fn palette_dither_uses_only_palette_colors() {
        let img = RgbImage::from_fn(12, 12, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 90]));
        let palette = Palette::from_colors(vec![Rgb([0, 0, 0]), Rgb([255, 255, 255]), Rgb([200, 40, 40])]);
        let result = dither_to_palette(&img, &palette);

        assert_eq!(result.dimensions(), (12, 12));
        for pixel in result.pixels() {
            assert!(palette.colors().contains(pixel), "{pixel:?} not in palette");
        }
    }

    #[test]
    fn palette_dither_mixes_for_midtones() {
        let img = RgbImage::from_pixel(8, 8, Rgb([128, 128, 128]));
        let palette = Palette::from_colors(vec![Rgb([0, 0, 0]), Rgb([255, 255, 255])]);
        let result = dither_to_palette(&img, &palette);

        let whites = result.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(whites > 16 && whites < 48, "whites = {whites}");
    }
}
