//! The band glitch transform.

use image::RgbImage;
use tracing::{debug, info};

use crate::band::BandDescriptor;
use crate::blend::write_band;
use crate::random::RandomSource;
use crate::roll::{roll_channel_columns, roll_channel_rows};
use crate::{GlitchError, Result};

/// Tuning knobs for [`glitch`].
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchParams {
    /// Largest horizontal band shift in either direction.
    pub max_offset: i32,
    /// Nominal band height; actual heights vary from 0.7x to 1.5x.
    pub base_band_height: i32,
    pub color_glitch_probability: f64,
    pub saturation_probability: f64,
    pub brightness_probability: f64,
    /// Blur bands taller than four rows.
    pub blur_bands: bool,
    /// Largest per-channel displacement in the final pass. 0 skips the pass.
    pub channel_shift: i32,
}

impl GlitchParams {
    pub const DEFAULT_SATURATION_PROBABILITY: f64 = 0.15;
    pub const DEFAULT_BRIGHTNESS_PROBABILITY: f64 = 0.10;
    pub const DEFAULT_CHANNEL_SHIFT: i32 = 5;

    /// Parameters with the stock saturation, brightness, blur and channel
    /// shift settings.
    pub fn new(max_offset: i32, base_band_height: i32, color_glitch_probability: f64) -> Self {
        Self {
            max_offset,
            base_band_height,
            color_glitch_probability,
            saturation_probability: Self::DEFAULT_SATURATION_PROBABILITY,
            brightness_probability: Self::DEFAULT_BRIGHTNESS_PROBABILITY,
            blur_bands: true,
            channel_shift: Self::DEFAULT_CHANNEL_SHIFT,
        }
    }

    /// Reject malformed values.
    pub fn validate(&self) -> Result<()> {
        if self.max_offset < 0 {
            return Err(invalid("max_offset", format!("must be >= 0, got {}", self.max_offset)));
        }
        if self.base_band_height < 1 {
            return Err(invalid(
                "base_band_height",
                format!("must be >= 1, got {}", self.base_band_height),
            ));
        }
        if self.channel_shift < 0 {
            return Err(invalid(
                "channel_shift",
                format!("must be >= 0, got {}", self.channel_shift),
            ));
        }
        for (name, p) in [
            ("color_glitch_probability", self.color_glitch_probability),
            ("saturation_probability", self.saturation_probability),
            ("brightness_probability", self.brightness_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(name, format!("must be within [0, 1], got {p}")));
            }
        }
        Ok(())
    }

    /// Closed range band heights are drawn from: `floor(0.7 * base)` (at
    /// least 1) to `floor(1.5 * base)`. Widened so any `i32` base fits.
    pub fn band_height_range(&self) -> (i64, i64) {
        let base = i64::from(self.base_band_height.max(1));
        let low = (base * 7 / 10).max(1);
        let high = (base * 3 / 2).max(low);
        (low, high)
    }
}

impl Default for GlitchParams {
    fn default() -> Self {
        Self::new(20, 10, 0.3)
    }
}

fn invalid(name: &'static str, reason: String) -> GlitchError {
    GlitchError::InvalidParameter { name, reason }
}

/// Per-channel displacement of the final pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOffsets {
    /// Horizontal.
    pub red: i64,
    /// Vertical.
    pub green: i64,
    /// Horizontal.
    pub blue: i64,
}

impl ChannelOffsets {
    fn draw<R: RandomSource + ?Sized>(rng: &mut R, limit: i32) -> Self {
        let limit = i64::from(limit);
        let red = rng.int_in(-limit, limit);
        let green = rng.int_in(-limit, limit);
        let blue = rng.int_in(-limit, limit);
        Self { red, green, blue }
    }

    fn apply(&self, raster: &mut RgbImage) {
        roll_channel_columns(raster, 0, self.red);
        roll_channel_rows(raster, 1, self.green);
        roll_channel_columns(raster, 2, self.blue);
    }
}

/// Result of [`glitch_with_report`]: the image plus every decision made.
#[derive(Debug, Clone)]
pub struct GlitchOutcome {
    pub image: RgbImage,
    pub bands: Vec<BandDescriptor>,
    /// `None` when the channel shift is disabled.
    pub channel_offsets: Option<ChannelOffsets>,
}

/// Apply the glitch effect to `input`, returning a new raster of the same size.
pub fn glitch<R: RandomSource + ?Sized>(
    input: &RgbImage,
    params: &GlitchParams,
    rng: &mut R,
) -> Result<RgbImage> {
    glitch_with_report(input, params, rng).map(|outcome| outcome.image)
}

/// Like [`glitch`], also returning the band plan and channel offsets.
///
/// Parameters and dimensions are checked before the first draw.
pub fn glitch_with_report<R: RandomSource + ?Sized>(
    input: &RgbImage,
    params: &GlitchParams,
    rng: &mut R,
) -> Result<GlitchOutcome> {
    params.validate()?;
    let (width, height) = input.dimensions();
    if width == 0 || height == 0 {
        return Err(GlitchError::EmptyRaster { width, height });
    }

    let mut raster = input.clone();
    let mut bands = Vec::new();
    let mut y = 0;
    while y < height {
        let band = BandDescriptor::plan(rng, params, y, height - y);
        let rendered = band.render(&raster);
        write_band(&mut raster, &rendered, y);
        y += band.height;
        bands.push(band);
    }
    debug!(bands = bands.len(), width, height, "Band scan complete");

    let channel_offsets = (params.channel_shift > 0).then(|| {
        let offsets = ChannelOffsets::draw(rng, params.channel_shift);
        offsets.apply(&mut raster);
        offsets
    });
    if let Some(offsets) = &channel_offsets {
        debug!(
            red = offsets.red,
            green = offsets.green,
            blue = offsets.blue,
            "Channels shifted"
        );
    }

    info!(width, height, bands = bands.len(), "Glitch applied");
    Ok(GlitchOutcome {
        image: raster,
        bands,
        channel_offsets,
    })
}

#[cfg(test)]
#[path = "glitch_tests.rs"]
mod tests;
