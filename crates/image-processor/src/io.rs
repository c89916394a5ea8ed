//! Image decode/encode helpers.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::{ProcessError, Result};

/// Load an image from disk. The format is detected from the file contents.
///
/// # Errors
///
/// Returns [`ProcessError::Load`] if the file is missing or undecodable.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| ProcessError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Loaded image"
    );
    Ok(img)
}

/// Save an image, choosing the format from the file extension.
///
/// Parent directories are created. Images with alpha are flattened to RGB
/// when the target format (JPEG) cannot store it.
///
/// # Errors
///
/// Returns [`ProcessError::Save`] if encoding fails, or
/// [`ProcessError::Io`] if the parent directory cannot be created.
pub fn save_image<P: AsRef<Path>>(img: &DynamicImage, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let flattened;
    let to_write = match extension.as_str() {
        "jpg" | "jpeg" if img.color().has_alpha() => {
            flattened = DynamicImage::ImageRgb8(img.to_rgb8());
            &flattened
        }
        _ => img,
    };

    to_write.save(path).map_err(|source| ProcessError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Saved image");
    Ok(())
}
