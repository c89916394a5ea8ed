//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image_processor::PixelMode;

use crate::config::{SettingError, SettingsManager};

/// Avatar and product image effects: glitch, frame, pixel art, sold out.
#[derive(Parser, Debug)]
#[command(name = "avatar-fx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply the scanline band glitch effect.
    Glitch {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Largest horizontal band shift in pixels.
        #[arg(long, value_name = "INT")]
        max_offset: Option<i32>,

        /// Base band height in rows.
        #[arg(long, value_name = "INT")]
        band_height: Option<i32>,

        /// Probability of a color bias per band (0.0-1.0).
        #[arg(long, value_name = "FLOAT")]
        color_prob: Option<f64>,

        /// Largest per-channel shift; 0 disables the pass.
        #[arg(long, value_name = "INT")]
        channel_shift: Option<i32>,

        /// Random seed for reproducible output.
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,
    },

    /// Place an avatar inside a decorative frame.
    Frame {
        #[arg(value_name = "AVATAR")]
        avatar: PathBuf,

        #[arg(value_name = "FRAME")]
        frame: PathBuf,

        /// Output PNG path. Defaults to `<avatar>_with_frame.png`.
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Fraction of the frame's content area the avatar fills.
        #[arg(long, value_name = "FLOAT")]
        fill_ratio: Option<f64>,
    },

    /// List frame images in a directory.
    Frames {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Convert a photo to pixel art.
    Pixelate {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// `color` or `bw`.
        #[arg(long, value_name = "MODE")]
        mode: Option<PixelMode>,

        /// Block size in pixels.
        #[arg(long, value_name = "INT")]
        pixel_size: Option<u32>,

        /// Palette size in color mode.
        #[arg(long, value_name = "INT")]
        colors: Option<usize>,

        /// Sharpness factor.
        #[arg(long, value_name = "FLOAT")]
        edge_enhance: Option<f32>,

        /// Contrast factor.
        #[arg(long, value_name = "FLOAT")]
        contrast: Option<f32>,

        /// Floyd-Steinberg dithering.
        #[arg(long)]
        dither: bool,
    },

    /// Compose a grayscale "sold out" product image with a watermark.
    SoldOut {
        #[arg(value_name = "PRODUCT")]
        product: PathBuf,

        /// Product with its background removed (RGBA, same size).
        #[arg(value_name = "CUTOUT")]
        cutout: PathBuf,

        #[arg(value_name = "WATERMARK")]
        watermark: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Background blur radius.
        #[arg(long, value_name = "FLOAT")]
        blur_radius: Option<f32>,

        /// Watermark distance from the bottom-right corner.
        #[arg(long, value_name = "INT")]
        margin: Option<u32>,
    },

    /// Print resolved settings as JSON.
    Config,
}

impl Command {
    /// Setting overrides carried by this command's flags.
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                out.push((key, v));
            }
        };
        match self {
            Self::Glitch {
                max_offset,
                band_height,
                color_prob,
                channel_shift,
                seed,
                ..
            } => {
                push("GLITCH_MAX_OFFSET", max_offset.map(|v| v.to_string()));
                push("GLITCH_BAND_HEIGHT", band_height.map(|v| v.to_string()));
                push("GLITCH_COLOR_PROB", color_prob.map(|v| v.to_string()));
                push("GLITCH_CHANNEL_SHIFT", channel_shift.map(|v| v.to_string()));
                push("GLITCH_SEED", seed.map(|v| v.to_string()));
            }
            Self::Frame { fill_ratio, .. } => {
                push("FRAME_FILL_RATIO", fill_ratio.map(|v| v.to_string()));
            }
            Self::Pixelate {
                mode,
                pixel_size,
                colors,
                edge_enhance,
                contrast,
                dither,
                ..
            } => {
                push("PIXEL_MODE", mode.map(|v| v.to_string()));
                push("PIXEL_SIZE", pixel_size.map(|v| v.to_string()));
                push("PIXEL_COLORS", colors.map(|v| v.to_string()));
                push("PIXEL_EDGE_ENHANCE", edge_enhance.map(|v| v.to_string()));
                push("PIXEL_CONTRAST", contrast.map(|v| v.to_string()));
                push("PIXEL_DITHER", dither.then(|| "true".to_string()));
            }
            Self::SoldOut {
                blur_radius,
                margin,
                ..
            } => {
                push("SOLD_OUT_BLUR_RADIUS", blur_radius.map(|v| v.to_string()));
                push("SOLD_OUT_MARGIN", margin.map(|v| v.to_string()));
            }
            Self::Frames { .. } | Self::Config => {}
        }
        out
    }

    /// Apply this command's flags to `sm` as CLI overrides.
    pub fn apply_overrides(&self, sm: &mut SettingsManager) -> Result<(), SettingError> {
        for (key, value) in self.overrides() {
            sm.set_override(key, &value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn glitch_flags_become_overrides() {
        let cli = parse(&[
            "avatar-fx",
            "glitch",
            "in.png",
            "out.png",
            "--max-offset",
            "12",
            "--seed",
            "9",
        ]);
        assert_eq!(
            cli.command.overrides(),
            vec![
                ("GLITCH_MAX_OFFSET", "12".to_string()),
                ("GLITCH_SEED", "9".to_string())
            ]
        );
    }

    #[test]
    fn pixelate_mode_and_dither() {
        let cli = parse(&["avatar-fx", "-v", "pixelate", "a.jpg", "b.png", "--mode", "bw", "--dither"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command.overrides(),
            vec![
                ("PIXEL_MODE", "bw".to_string()),
                ("PIXEL_DITHER", "true".to_string())
            ]
        );
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        assert!(Cli::try_parse_from(["avatar-fx", "pixelate", "a", "b", "--mode", "sepia"]).is_err());
    }

    #[test]
    fn frame_output_is_optional() {
        let cli = parse(&["avatar-fx", "frame", "me.png", "gold.png"]);
        match cli.command {
            Command::Frame { output, .. } => assert!(output.is_none()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn out_of_range_flag_rejected_by_settings() {
        let cli = parse(&["avatar-fx", "glitch", "a", "b", "--color-prob", "3"]);
        let mut sm = SettingsManager::default();
        assert!(matches!(
            cli.command.apply_overrides(&mut sm),
            Err(SettingError::Invalid { .. })
        ));
    }
}
