//! Avatar framing: scale an avatar into a decorative frame's content area.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use crate::compose::{alpha_composite, content_bbox, paste};
use crate::resize::scale_by;
use crate::{IMAGE_EXTENSIONS, ProcessError, Result};

/// Default fraction of the frame's content box the avatar content may fill.
pub const DEFAULT_FILL_RATIO: f64 = 0.8;

/// Compose `avatar` underneath `frame`.
///
/// The avatar is scaled so its visible content fits within `fill_ratio` of
/// the frame's visible content on both axes, centered on a transparent
/// canvas the size of the frame, and the frame is alpha-composited on top.
pub fn add_frame(avatar: &DynamicImage, frame: &DynamicImage, fill_ratio: f64) -> Result<RgbaImage> {
    if !(fill_ratio > 0.0 && fill_ratio <= 1.0) {
        return Err(ProcessError::InvalidParameter {
            name: "fill_ratio",
            reason: format!("must be in (0, 1], got {fill_ratio}"),
        });
    }

    let frame = frame.to_rgba8();
    let avatar_rgba = avatar.to_rgba8();

    let frame_area = content_bbox(&frame);
    let avatar_area = content_bbox(&avatar_rgba);
    if avatar_area.width() == 0 || avatar_area.height() == 0 {
        return Err(ProcessError::TooSmall {
            width: avatar_rgba.width(),
            height: avatar_rgba.height(),
        });
    }

    let scale_w = f64::from(frame_area.width()) / f64::from(avatar_area.width()) * fill_ratio;
    let scale_h = f64::from(frame_area.height()) / f64::from(avatar_area.height()) * fill_ratio;
    let scale = scale_w.min(scale_h);
    debug!(?frame_area, ?avatar_area, scale, "Computed avatar scale");

    let scaled = scale_by(&DynamicImage::ImageRgba8(avatar_rgba), scale).to_rgba8();

    let mut canvas = RgbaImage::new(frame.width(), frame.height());
    let paste_x = (i64::from(frame.width()) - i64::from(scaled.width())).div_euclid(2);
    let paste_y = (i64::from(frame.height()) - i64::from(scaled.height())).div_euclid(2);
    paste(&mut canvas, &scaled, paste_x, paste_y);

    let result = alpha_composite(&canvas, &frame)?;
    info!(
        width = result.width(),
        height = result.height(),
        paste_x,
        paste_y,
        "Avatar framed"
    );
    Ok(result)
}

/// Default output path: `<stem>_with_frame.png` next to the avatar.
pub fn default_output_path(avatar_path: &Path) -> PathBuf {
    let stem = avatar_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("avatar");
    avatar_path.with_file_name(format!("{stem}_with_frame.png"))
}

/// List image files in `dir` usable as frames, sorted by name.
pub fn list_frames(dir: &Path) -> Result<Vec<String>> {
    let mut frames: Vec<String> = std::fs::read_dir(dir)?
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    frames.sort();
    debug!(dir = %dir.display(), count = frames.len(), "Listed frames");
    Ok(frames)
}
