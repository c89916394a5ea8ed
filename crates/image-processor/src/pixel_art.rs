//! Retro pixel-art conversion: block averaging over a reduced palette.

use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, GrayImage, ImageBuffer, Pixel};
use tracing::debug;

use crate::dither::{dither_to_palette, floyd_steinberg_dither};
use crate::enhance::{LumaPixel, contrast, sharpness, to_gray};
use crate::quantize::Palette;
use crate::resize::trim_to_multiple;
use crate::{ProcessError, Result};

/// Output color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelMode {
    /// Quantized color blocks.
    #[default]
    Color,
    /// Grayscale blocks.
    Bw,
}

impl FromStr for PixelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "color" => Ok(Self::Color),
            "bw" => Ok(Self::Bw),
            other => Err(format!("unknown pixel mode '{other}' (expected 'color' or 'bw')")),
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "color"),
            Self::Bw => write!(f, "bw"),
        }
    }
}

/// Pixel-art conversion settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArtOptions {
    /// Edge length of each square block, in source pixels.
    pub pixel_size: u32,
    pub mode: PixelMode,
    /// Palette size in color mode.
    pub colors: usize,
    /// Sharpness factor, applied only when greater than 1.0.
    pub edge_enhance: f32,
    /// Contrast factor, applied only when not 1.0.
    pub contrast: f32,
    /// Error-diffuse onto the palette (color), or across blocks to black
    /// and white (bw).
    pub dither: bool,
}

impl Default for PixelArtOptions {
    fn default() -> Self {
        Self {
            pixel_size: 10,
            mode: PixelMode::Color,
            colors: 8,
            edge_enhance: 1.5,
            contrast: 1.3,
            dither: false,
        }
    }
}

/// Convert an image to pixel art.
///
/// 1. Resize so both dimensions are multiples of `pixel_size`
/// 2. Reduce colors (grayscale, or a median-cut palette)
/// 3. Fill each block with its mean color
/// 4. Apply sharpness and contrast adjustments
pub fn convert_to_pixel_art(img: &DynamicImage, options: &PixelArtOptions) -> Result<DynamicImage> {
    validate_options(options)?;
    let trimmed = trim_to_multiple(img, options.pixel_size)?;
    debug!(
        width = trimmed.width(),
        height = trimmed.height(),
        mode = %options.mode,
        pixel_size = options.pixel_size,
        "Converting to pixel art"
    );

    let result = match options.mode {
        PixelMode::Bw => {
            let mut gray = to_gray(&trimmed.to_rgb8());
            if options.dither {
                gray = dither_blocks(&gray, options.pixel_size);
            }
            DynamicImage::ImageLuma8(finish(gray, options))
        }
        PixelMode::Color => {
            let rgb = trimmed.to_rgb8();
            let palette = Palette::median_cut(&rgb, options.colors)?;
            let reduced = if options.dither {
                dither_to_palette(&rgb, &palette)
            } else {
                palette.remap(&rgb)
            };
            DynamicImage::ImageRgb8(finish(reduced, options))
        }
    };

    Ok(result)
}

fn finish<P>(mut img: ImageBuffer<P, Vec<u8>>, options: &PixelArtOptions) -> ImageBuffer<P, Vec<u8>>
where
    P: LumaPixel,
{
    fill_blocks(&mut img, options.pixel_size);
    if options.edge_enhance > 1.0 {
        img = sharpness(&img, options.edge_enhance);
    }
    if options.contrast != 1.0 {
        img = contrast(&img, options.contrast);
    }
    img
}

/// Replace each `block` x `block` tile with its truncated per-channel mean.
///
/// The image dimensions must be multiples of `block`.
fn fill_blocks<P: Pixel<Subpixel = u8>>(img: &mut ImageBuffer<P, Vec<u8>>, block: u32) {
    let (width, height) = img.dimensions();
    let ch = usize::from(P::CHANNEL_COUNT);
    let area = u64::from(block) * u64::from(block);
    let row_len = width as usize * ch;
    let raw: &mut [u8] = &mut *img;

    for by in (0..height).step_by(block as usize) {
        for bx in (0..width).step_by(block as usize) {
            let mut sums = [0u64; 4];
            for y in by..by + block {
                for x in bx..bx + block {
                    let idx = y as usize * row_len + x as usize * ch;
                    for c in 0..ch {
                        sums[c] += u64::from(raw[idx + c]);
                    }
                }
            }
            let mean: Vec<u8> = sums[..ch].iter().map(|s| (s / area) as u8).collect();
            for y in by..by + block {
                for x in bx..bx + block {
                    let idx = y as usize * row_len + x as usize * ch;
                    raw[idx..idx + ch].copy_from_slice(&mean);
                }
            }
        }
    }
}

/// Dither block means to black and white, one decision per block.
fn dither_blocks(gray: &GrayImage, block: u32) -> GrayImage {
    let mut filled = gray.clone();
    fill_blocks(&mut filled, block);
    let grid = GrayImage::from_fn(gray.width() / block, gray.height() / block, |bx, by| {
        *filled.get_pixel(bx * block, by * block)
    });
    let dithered = floyd_steinberg_dither(&grid);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        *dithered.get_pixel(x / block, y / block)
    })
}

/// Validate options independently of any image.
pub fn validate_options(options: &PixelArtOptions) -> Result<()> {
    if options.pixel_size == 0 {
        return Err(ProcessError::InvalidParameter {
            name: "pixel_size",
            reason: "must be at least 1".into(),
        });
    }
    if options.mode == PixelMode::Color && !(1..=crate::quantize::MAX_COLORS).contains(&options.colors) {
        return Err(ProcessError::InvalidParameter {
            name: "colors",
            reason: format!("must be between 1 and 256, got {}", options.colors),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn plain(options: PixelArtOptions) -> PixelArtOptions {
        PixelArtOptions {
            edge_enhance: 1.0,
            contrast: 1.0,
            ..options
        }
    }

    #[test]
    fn parse_mode() {
        assert_eq!("color".parse::<PixelMode>().unwrap(), PixelMode::Color);
        assert_eq!("bw".parse::<PixelMode>().unwrap(), PixelMode::Bw);
        assert!("sepia".parse::<PixelMode>().is_err());
        assert_eq!(PixelMode::Bw.to_string(), "bw");
    }

    #[test]
    fn fill_blocks_averages_with_truncation() {
        let mut img = GrayImage::new(2, 2);
        img.put_pixel(0, 0, Luma([10]));
        img.put_pixel(1, 0, Luma([11]));
        img.put_pixel(0, 1, Luma([11]));
        img.put_pixel(1, 1, Luma([11]));
        fill_blocks(&mut img, 2);
        // 43 / 4 = 10.75 -> 10
        assert!(img.iter().all(|&v| v == 10));
    }

    #[test]
    fn bw_mode_produces_uniform_blocks() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(23, 17, |x, y| {
            Rgb([(x * 11) as u8, (y * 13) as u8, 77])
        }));
        let options = plain(PixelArtOptions {
            pixel_size: 5,
            mode: PixelMode::Bw,
            ..Default::default()
        });
        let result = convert_to_pixel_art(&img, &options).unwrap().to_luma8();

        assert_eq!(result.dimensions(), (20, 15));
        for by in (0..15).step_by(5) {
            for bx in (0..20).step_by(5) {
                let first = result.get_pixel(bx, by);
                for y in by..by + 5 {
                    for x in bx..bx + 5 {
                        assert_eq!(result.get_pixel(x, y), first);
                    }
                }
            }
        }
    }

    #[test]
    fn color_mode_is_rgb_and_limited() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(40, 40, |x, y| {
            Rgb([(x * 6) as u8, (y * 6) as u8, ((x + y) * 3) as u8])
        }));
        let options = plain(PixelArtOptions {
            pixel_size: 4,
            colors: 4,
            ..Default::default()
        });
        let result = convert_to_pixel_art(&img, &options).unwrap();
        assert!(matches!(result, DynamicImage::ImageRgb8(_)));
        assert_eq!((result.width(), result.height()), (40, 40));
    }

    #[test]
    fn solid_image_stays_solid_without_enhancement() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([90, 120, 30])));
        let result = convert_to_pixel_art(&img, &plain(PixelArtOptions::default()))
            .unwrap()
            .to_rgb8();
        assert!(result.pixels().all(|p| p.0 == [90, 120, 30]));
    }

    #[test]
    fn dithered_bw_blocks_are_black_or_white() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([100, 100, 100])));
        let options = plain(PixelArtOptions {
            pixel_size: 5,
            mode: PixelMode::Bw,
            dither: true,
            ..Default::default()
        });
        let result = convert_to_pixel_art(&img, &options).unwrap().to_luma8();

        assert_eq!(result.dimensions(), (20, 20));
        let mut levels = Vec::new();
        for by in (0..20).step_by(5) {
            for bx in (0..20).step_by(5) {
                let first = result.get_pixel(bx, by)[0];
                assert!(first == 0 || first == 255, "block value {first}");
                for y in by..by + 5 {
                    for x in bx..bx + 5 {
                        assert_eq!(result.get_pixel(x, y)[0], first);
                    }
                }
                levels.push(first);
            }
        }
        assert!(levels.contains(&0) && levels.contains(&255), "{levels:?}");
    }

    #[test]
    fn dither_blocks_diffuses_across_the_block_grid() {
        let gray = GrayImage::from_pixel(4, 2, Luma([128]));
        let out = dither_blocks(&gray, 2);
        // grid [128, 128]: first block white, error -127 pushes the second to 0
        assert!(out.enumerate_pixels().all(|(x, _, p)| p[0] == if x < 2 { 255 } else { 0 }));
    }

    #[test]
    fn image_smaller_than_block_is_rejected() {
        let img = DynamicImage::new_rgb8(4, 4);
        let options = PixelArtOptions::default();
        assert!(matches!(
            convert_to_pixel_art(&img, &options),
            Err(ProcessError::TooSmall { .. })
        ));
    }

    #[test]
    fn validate_options_checks_ranges() {
        assert!(validate_options(&PixelArtOptions::default()).is_ok());
        let zero = PixelArtOptions {
            pixel_size: 0,
            ..Default::default()
        };
        assert!(validate_options(&zero).is_err());
        let many = PixelArtOptions {
            colors: 300,
            ..Default::default()
        };
        assert!(validate_options(&many).is_err());
    }
}
