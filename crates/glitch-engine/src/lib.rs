//! Scanline glitch effect for RGB rasters.
//!
//! The image is scanned top to bottom in bands of randomized height. Each
//! band is cyclically shifted sideways and may pick up a color bias,
//! saturation or brightness change, and a soft blur; its top rows are
//! cross-faded into what is already in the raster. A final pass displaces
//! the red, green, and blue channels independently.
//!
//! Every random decision goes through [`RandomSource`], so a seeded source
//! reproduces the same output byte for byte.

pub mod band;
pub mod blend;
pub mod glitch;
pub mod random;
pub mod roll;

// Re-exports for convenience
pub use band::{BandDescriptor, BandStep, COLOR_BIASES};
pub use glitch::{ChannelOffsets, GlitchOutcome, GlitchParams, glitch, glitch_with_report};
pub use random::RandomSource;

/// Errors rejected before any random draw is made.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GlitchError {
    #[error("raster is empty ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Result alias for glitch operations.
pub type Result<T> = std::result::Result<T, GlitchError>;
