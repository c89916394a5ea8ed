//! Per-band planning and transform steps.
//!
//! Planning makes every random draw for a band up front and records the
//! outcome in a [`BandDescriptor`]. The descriptor then expands into an
//! ordered list of [`BandStep`]s, which are applied to a copy of the band
//! without touching the random source.

use image::{RgbImage, imageops};
use image_processor::enhance;
use tracing::trace;

use crate::glitch::GlitchParams;
use crate::random::RandomSource;
use crate::roll::roll_columns;

/// Color biases a band may receive, one picked uniformly.
pub const COLOR_BIASES: [[i32; 3]; 6] = [
    [30, 0, 0],
    [0, 30, 0],
    [0, 0, 30],
    [30, 30, 0],
    [0, 30, 30],
    [30, 0, 30],
];

/// Saturation factor range.
pub const SATURATION_RANGE: (f64, f64) = (0.3, 1.7);

/// Brightness factor range.
pub const BRIGHTNESS_RANGE: (f64, f64) = (0.5, 1.5);

/// Bands taller than this are blurred.
pub const BLUR_MIN_HEIGHT: u32 = 4;

/// Gaussian blur radius applied to tall bands.
pub const BLUR_RADIUS: f32 = 1.0;

/// Everything decided about one band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandDescriptor {
    pub start_row: u32,
    pub height: u32,
    pub horizontal_offset: i64,
    pub color_bias: Option<[i32; 3]>,
    pub saturation_factor: Option<f32>,
    pub brightness_factor: Option<f32>,
    pub blurred: bool,
}

/// One transform applied to a band buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandStep {
    Roll(i64),
    ColorBias([i32; 3]),
    Saturation(f32),
    Brightness(f32),
    Blur,
}

impl BandDescriptor {
    /// Draw the band starting at `start_row` with `remaining` rows left.
    ///
    /// Draw order: height, offset, color chance (and pick), saturation
    /// chance (and factor), brightness chance (and factor).
    pub fn plan<R: RandomSource + ?Sized>(
        rng: &mut R,
        params: &GlitchParams,
        start_row: u32,
        remaining: u32,
    ) -> Self {
        let (low, high) = params.band_height_range();
        let drawn = rng.int_in(low, high);
        let height = drawn.clamp(1, i64::from(remaining)) as u32;

        let max_offset = i64::from(params.max_offset);
        let horizontal_offset = rng.int_in(-max_offset, max_offset);

        let color_bias = rng.chance(params.color_glitch_probability).then(|| {
            let last = COLOR_BIASES.len() as i64 - 1;
            let index = rng.int_in(0, last).clamp(0, last) as usize;
            COLOR_BIASES[index]
        });

        let saturation_factor = rng
            .chance(params.saturation_probability)
            .then(|| rng.float_in(SATURATION_RANGE.0, SATURATION_RANGE.1) as f32);

        let brightness_factor = rng
            .chance(params.brightness_probability)
            .then(|| rng.float_in(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1) as f32);

        let blurred = params.blur_bands && height > BLUR_MIN_HEIGHT;

        let band = Self {
            start_row,
            height,
            horizontal_offset,
            color_bias,
            saturation_factor,
            brightness_factor,
            blurred,
        };
        trace!(?band, "Planned band");
        band
    }

    /// Steps in application order. The roll is always present.
    pub fn steps(&self) -> Vec<BandStep> {
        let mut steps = vec![BandStep::Roll(self.horizontal_offset)];
        if let Some(bias) = self.color_bias {
            steps.push(BandStep::ColorBias(bias));
        }
        if let Some(factor) = self.saturation_factor {
            steps.push(BandStep::Saturation(factor));
        }
        if let Some(factor) = self.brightness_factor {
            steps.push(BandStep::Brightness(factor));
        }
        if self.blurred {
            steps.push(BandStep::Blur);
        }
        steps
    }

    /// Copy this band's rows out of `raster` and run its steps on them.
    pub fn render(&self, raster: &RgbImage) -> RgbImage {
        let band = imageops::crop_imm(raster, 0, self.start_row, raster.width(), self.height).to_image();
        apply_steps(band, &self.steps())
    }
}

/// Apply `steps` in order to a band buffer.
pub fn apply_steps(band: RgbImage, steps: &[BandStep]) -> RgbImage {
    steps.iter().fold(band, |band, step| apply_step(band, *step))
}

fn apply_step(mut band: RgbImage, step: BandStep) -> RgbImage {
    match step {
        BandStep::Roll(offset) => roll_columns(&band, offset),
        BandStep::ColorBias(bias) => {
            for pixel in band.pixels_mut() {
                for (sample, add) in pixel.0.iter_mut().zip(bias) {
                    *sample = (i32::from(*sample) + add).clamp(0, 255) as u8;
                }
            }
            band
        }
        BandStep::Saturation(factor) => enhance::color(&band, factor),
        BandStep::Brightness(factor) => enhance::brightness(&band, factor),
        BandStep::Blur => enhance::gaussian_blur(&band, BLUR_RADIUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> GlitchParams {
        GlitchParams::new(20, 10, 0.3)
    }

    #[test]
    fn plan_respects_height_and_offset_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = params();
        for _ in 0..200 {
            let band = BandDescriptor::plan(&mut rng, &p, 0, 1000);
            assert!((7..=15).contains(&band.height), "height {}", band.height);
            assert!((-20..=20).contains(&band.horizontal_offset));
            if let Some(f) = band.saturation_factor {
                assert!((0.3..=1.7).contains(&f));
            }
            if let Some(f) = band.brightness_factor {
                assert!((0.5..=1.5).contains(&f));
            }
            if let Some(bias) = band.color_bias {
                assert!(COLOR_BIASES.contains(&bias));
            }
            assert!(band.blurred);
        }
    }

    #[test]
    fn plan_clips_to_remaining_rows() {
        let mut rng = StdRng::seed_from_u64(5);
        let band = BandDescriptor::plan(&mut rng, &params(), 95, 3);
        assert_eq!(band.height, 3);
        assert!(!band.blurred);
    }

    #[test]
    fn steps_follow_fixed_order() {
        let band = BandDescriptor {
            start_row: 0,
            height: 8,
            horizontal_offset: -3,
            color_bias: Some([0, 30, 0]),
            saturation_factor: Some(0.5),
            brightness_factor: Some(1.2),
            blurred: true,
        };
        assert_eq!(
            band.steps(),
            vec![
                BandStep::Roll(-3),
                BandStep::ColorBias([0, 30, 0]),
                BandStep::Saturation(0.5),
                BandStep::Brightness(1.2),
                BandStep::Blur,
            ]
        );
    }

    #[test]
    fn color_bias_clamps() {
        let band = RgbImage::from_pixel(2, 2, Rgb([240, 100, 0]));
        let out = apply_steps(band, &[BandStep::ColorBias([30, 30, 0])]);
        assert!(out.pixels().all(|p| p.0 == [255, 130, 0]));
    }

    #[test]
    fn render_copies_only_band_rows() {
        let raster = RgbImage::from_fn(4, 6, |x, y| Rgb([x as u8, y as u8, 0]));
        let band = BandDescriptor {
            start_row: 2,
            height: 3,
            horizontal_offset: 1,
            color_bias: None,
            saturation_factor: None,
            brightness_factor: None,
            blurred: false,
        };
        let out = band.render(&raster);
        assert_eq!(out.dimensions(), (4, 3));
        assert_eq!(out.get_pixel(0, 0).0, [3, 2, 0]);
        assert_eq!(out.get_pixel(1, 2).0, [0, 4, 0]);
    }
}
