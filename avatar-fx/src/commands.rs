//! Command implementations: load inputs, run a pipeline, write the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use image_processor::{
    add_frame, convert_to_pixel_art, default_output_path, list_frames, load_image, save_image,
    sold_out,
};

use crate::cli::Command;
use crate::config::{AppConfig, SettingsManager};

/// Run one subcommand. Printable output (frame listings, config JSON) goes to stdout.
pub fn dispatch(command: &Command, sm: &SettingsManager, config: &AppConfig) -> Result<()> {
    match command {
        Command::Glitch { input, output, .. } => {
            glitch_file(input, output, config)?;
        }
        Command::Frame {
            avatar,
            frame,
            output,
            ..
        } => {
            frame_file(avatar, frame, output.as_deref(), config)?;
        }
        Command::Frames { dir } => {
            let listing = frame_listing(dir)?;
            if listing.is_empty() {
                warn!(dir = %dir.display(), "No frame images found");
            }
            for line in listing {
                println!("{line}");
            }
        }
        Command::Pixelate { input, output, .. } => {
            pixelate_file(input, output, config)?;
        }
        Command::SoldOut {
            product,
            cutout,
            watermark,
            output,
            ..
        } => {
            sold_out_files(product, cutout, watermark, output, config)?;
        }
        Command::Config => {
            println!("{}", config_json(sm)?);
        }
    }
    Ok(())
}

/// Glitch `input` into `output`. Returns the seed used.
pub fn glitch_file(input: &Path, output: &Path, config: &AppConfig) -> Result<u64> {
    let img = load_image(input)?.to_rgb8();
    let seed = config
        .glitch_seed
        .unwrap_or_else(|| StdRng::from_entropy().r#gen());
    info!(seed, "Glitching {}", input.display());

    let mut rng = StdRng::seed_from_u64(seed);
    let glitched = glitch_engine::glitch(&img, &config.glitch_params(), &mut rng)
        .context("Failed to apply glitch effect")?;

    save_image(&DynamicImage::ImageRgb8(glitched), output)?;
    info!("Saved glitched image to {}", output.display());
    Ok(seed)
}

/// Frame `avatar` with `frame`. Returns the path written.
pub fn frame_file(
    avatar: &Path,
    frame: &Path,
    output: Option<&Path>,
    config: &AppConfig,
) -> Result<PathBuf> {
    let output = match output {
        Some(path) => png_path(path),
        None => default_output_path(avatar),
    };

    let avatar_img = load_image(avatar)?;
    let frame_img = load_image(frame)?;
    let framed = add_frame(&avatar_img, &frame_img, config.frame_fill_ratio)
        .context("Failed to add frame")?;

    save_image(&DynamicImage::ImageRgba8(framed), &output)?;
    info!("Saved framed avatar to {}", output.display());
    Ok(output)
}

/// Framed output is always PNG so transparency survives.
fn png_path(path: &Path) -> PathBuf {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        path.to_path_buf()
    } else {
        let fixed = path.with_extension("png");
        warn!("Frame output must be PNG, writing {}", fixed.display());
        fixed
    }
}

/// Numbered frame names in `dir`, e.g. `1. gold.png`.
pub fn frame_listing(dir: &Path) -> Result<Vec<String>> {
    let frames = list_frames(dir).with_context(|| format!("Failed to list frames in {}", dir.display()))?;
    Ok(frames
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}", i + 1))
        .collect())
}

pub fn pixelate_file(input: &Path, output: &Path, config: &AppConfig) -> Result<()> {
    let img = load_image(input)?;
    let options = config.pixel_art_options();
    info!(mode = %options.mode, pixel_size = options.pixel_size, "Pixelating {}", input.display());

    let art = convert_to_pixel_art(&img, &options).context("Failed to convert to pixel art")?;
    save_image(&art, output)?;
    info!("Saved pixel art to {}", output.display());
    Ok(())
}

pub fn sold_out_files(
    product: &Path,
    cutout: &Path,
    watermark: &Path,
    output: &Path,
    config: &AppConfig,
) -> Result<()> {
    let product_img = load_image(product)?;
    let cutout_img = load_image(cutout)?;
    let watermark_img = load_image(watermark)?;

    let result = sold_out(
        &product_img,
        &cutout_img,
        &watermark_img,
        &config.sold_out_options(),
    )
    .context("Failed to compose sold-out image")?;

    save_image(&DynamicImage::ImageRgba8(result), output)?;
    info!("Saved sold-out image to {}", output.display());
    Ok(())
}

/// Resolved settings as pretty JSON.
pub fn config_json(sm: &SettingsManager) -> Result<String> {
    let settings = sm.get_all_settings()?;
    Ok(serde_json::to_string_pretty(&settings)?)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
