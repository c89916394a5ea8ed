//! Typed runtime configuration built from resolved settings.

use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context;
use glitch_engine::GlitchParams;
use image_processor::{PixelArtOptions, PixelMode, SoldOutOptions};

use super::manager::SettingsManager;

/// Runtime configuration for every command.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub glitch_max_offset: i32,
    pub glitch_band_height: i32,
    pub glitch_color_prob: f64,
    pub glitch_saturation_prob: f64,
    pub glitch_brightness_prob: f64,
    pub glitch_channel_shift: i32,
    pub glitch_seed: Option<u64>,
    pub frame_fill_ratio: f64,
    pub pixel_mode: PixelMode,
    pub pixel_size: u32,
    pub pixel_colors: usize,
    pub pixel_edge_enhance: f32,
    pub pixel_contrast: f32,
    pub pixel_dither: bool,
    pub sold_out_blur_radius: f32,
    pub sold_out_margin: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let glitch = GlitchParams::default();
        let pixel = PixelArtOptions::default();
        let sold_out = SoldOutOptions::default();
        Self {
            glitch_max_offset: glitch.max_offset,
            glitch_band_height: glitch.base_band_height,
            glitch_color_prob: glitch.color_glitch_probability,
            glitch_saturation_prob: glitch.saturation_probability,
            glitch_brightness_prob: glitch.brightness_probability,
            glitch_channel_shift: glitch.channel_shift,
            glitch_seed: None,
            frame_fill_ratio: image_processor::frame::DEFAULT_FILL_RATIO,
            pixel_mode: pixel.mode,
            pixel_size: pixel.pixel_size,
            pixel_colors: pixel.colors,
            pixel_edge_enhance: pixel.edge_enhance,
            pixel_contrast: pixel.contrast,
            pixel_dither: pixel.dither,
            sold_out_blur_radius: sold_out.blur_radius,
            sold_out_margin: sold_out.margin,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> { Ok(sm.get_setting(key)?) };

        let seed = g("GLITCH_SEED")?;
        let glitch_seed = if seed.is_empty() {
            None
        } else {
            Some(parse("GLITCH_SEED", &seed)?)
        };

        Ok(Self {
            glitch_max_offset: parse("GLITCH_MAX_OFFSET", &g("GLITCH_MAX_OFFSET")?)?,
            glitch_band_height: parse("GLITCH_BAND_HEIGHT", &g("GLITCH_BAND_HEIGHT")?)?,
            glitch_color_prob: parse("GLITCH_COLOR_PROB", &g("GLITCH_COLOR_PROB")?)?,
            glitch_saturation_prob: parse("GLITCH_SATURATION_PROB", &g("GLITCH_SATURATION_PROB")?)?,
            glitch_brightness_prob: parse("GLITCH_BRIGHTNESS_PROB", &g("GLITCH_BRIGHTNESS_PROB")?)?,
            glitch_channel_shift: parse("GLITCH_CHANNEL_SHIFT", &g("GLITCH_CHANNEL_SHIFT")?)?,
            glitch_seed,
            frame_fill_ratio: parse("FRAME_FILL_RATIO", &g("FRAME_FILL_RATIO")?)?,
            pixel_mode: parse("PIXEL_MODE", &g("PIXEL_MODE")?)?,
            pixel_size: parse("PIXEL_SIZE", &g("PIXEL_SIZE")?)?,
            pixel_colors: parse("PIXEL_COLORS", &g("PIXEL_COLORS")?)?,
            pixel_edge_enhance: parse("PIXEL_EDGE_ENHANCE", &g("PIXEL_EDGE_ENHANCE")?)?,
            pixel_contrast: parse("PIXEL_CONTRAST", &g("PIXEL_CONTRAST")?)?,
            pixel_dither: g("PIXEL_DITHER")? == "true",
            sold_out_blur_radius: parse("SOLD_OUT_BLUR_RADIUS", &g("SOLD_OUT_BLUR_RADIUS")?)?,
            sold_out_margin: parse("SOLD_OUT_MARGIN", &g("SOLD_OUT_MARGIN")?)?,
        })
    }

    pub fn glitch_params(&self) -> GlitchParams {
        GlitchParams {
            saturation_probability: self.glitch_saturation_prob,
            brightness_probability: self.glitch_brightness_prob,
            channel_shift: self.glitch_channel_shift,
            ..GlitchParams::new(
                self.glitch_max_offset,
                self.glitch_band_height,
                self.glitch_color_prob,
            )
        }
    }

    pub fn pixel_art_options(&self) -> PixelArtOptions {
        PixelArtOptions {
            pixel_size: self.pixel_size,
            mode: self.pixel_mode,
            colors: self.pixel_colors,
            edge_enhance: self.pixel_edge_enhance,
            contrast: self.pixel_contrast,
            dither: self.pixel_dither,
        }
    }

    pub fn sold_out_options(&self) -> SoldOutOptions {
        SoldOutOptions {
            blur_radius: self.sold_out_blur_radius,
            margin: self.sold_out_margin,
        }
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid value for {key}: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn manager(pairs: &[(&str, &str)]) -> SettingsManager {
        SettingsManager::with_env(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = AppConfig::load(&SettingsManager::default()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.glitch_params(), GlitchParams::default());
        assert_eq!(config.pixel_art_options(), PixelArtOptions::default());
        assert_eq!(config.sold_out_options(), SoldOutOptions::default());
    }

    #[test]
    fn env_values_are_typed() {
        let sm = manager(&[
            ("GLITCH_SEED", "42"),
            ("GLITCH_CHANNEL_SHIFT", "0"),
            ("PIXEL_MODE", "bw"),
            ("PIXEL_DITHER", "true"),
            ("SOLD_OUT_MARGIN", "4"),
        ]);
        let config = AppConfig::load(&sm).unwrap();
        assert_eq!(config.glitch_seed, Some(42));
        assert_eq!(config.glitch_params().channel_shift, 0);
        assert_eq!(config.pixel_mode, PixelMode::Bw);
        assert!(config.pixel_dither);
        assert_eq!(config.sold_out_options().margin, 4);
    }

    #[test]
    fn cli_override_reaches_params() {
        let mut sm = manager(&[("GLITCH_BAND_HEIGHT", "30")]);
        sm.set_override("GLITCH_BAND_HEIGHT", "6").unwrap();
        let params = AppConfig::load(&sm).unwrap().glitch_params();
        assert_eq!(params.base_band_height, 6);
    }

    #[test]
    fn invalid_env_fails_load() {
        let sm = manager(&[("FRAME_FILL_RATIO", "1.5")]);
        let err = AppConfig::load(&sm).unwrap_err();
        assert!(err.to_string().contains("FRAME_FILL_RATIO"));
    }
}
