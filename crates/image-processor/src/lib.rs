//! Image primitives and compositing pipelines for avatar effects.
//!
//! Provides enhancement (color, brightness, contrast, sharpness),
//! alpha compositing, median-cut quantization, Floyd-Steinberg dithering,
//! and the avatar-frame, pixel-art, and sold-out pipelines built on them.

use std::path::PathBuf;

pub mod compose;
pub mod dither;
pub mod enhance;
pub mod frame;
pub mod io;
pub mod pixel_art;
pub mod quantize;
pub mod resize;
pub mod sold_out;

// Re-exports for convenience
pub use compose::{BoundingBox, alpha_composite, content_bbox, paste, paste_masked};
pub use dither::{dither_to_palette, floyd_steinberg_dither};
pub use enhance::{brightness, color, contrast, gaussian_blur, luma, sharpness, to_gray};
pub use frame::{add_frame, default_output_path, list_frames};
pub use io::{load_image, save_image};
pub use pixel_art::{PixelArtOptions, PixelMode, convert_to_pixel_art};
pub use quantize::Palette;
pub use resize::{scale_by, trim_to_multiple};
pub use sold_out::{SoldOutOptions, sold_out};

/// File extensions accepted as image inputs.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Errors that can occur during image processing.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to load image from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("image dimensions mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("image too small: {width}x{height}")]
    TooSmall { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for image-processor operations.
pub type Result<T> = std::result::Result<T, ProcessError>;
