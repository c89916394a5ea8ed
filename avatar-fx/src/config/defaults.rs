//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const GLITCH_DEFS: &[DefTuple] = &[
    ("GLITCH_MAX_OFFSET", "20", "Largest horizontal band shift in pixels"),
    ("GLITCH_BAND_HEIGHT", "10", "Base band height in rows"),
    ("GLITCH_COLOR_PROB", "0.3", "Probability that a band gets a color bias"),
    ("GLITCH_SATURATION_PROB", "0.15", "Probability that a band's saturation is scaled"),
    ("GLITCH_BRIGHTNESS_PROB", "0.1", "Probability that a band's brightness is scaled"),
    ("GLITCH_CHANNEL_SHIFT", "5", "Largest per-channel shift in the final pass (0 disables)"),
    ("GLITCH_SEED", "", "Random seed; empty draws one from the OS"),
];

const FRAME_DEFS: &[DefTuple] = &[(
    "FRAME_FILL_RATIO",
    "0.8",
    "Fraction of the frame's content area the avatar fills",
)];

const PIXEL_DEFS: &[DefTuple] = &[
    ("PIXEL_MODE", "color", "Pixel art mode: color or bw"),
    ("PIXEL_SIZE", "10", "Pixel block size"),
    ("PIXEL_COLORS", "8", "Palette size in color mode"),
    ("PIXEL_EDGE_ENHANCE", "1.5", "Sharpness factor, applied when above 1.0"),
    ("PIXEL_CONTRAST", "1.3", "Contrast factor, applied when not 1.0"),
    ("PIXEL_DITHER", "false", "Floyd-Steinberg dithering onto the palette"),
];

const SOLD_OUT_DEFS: &[DefTuple] = &[
    ("SOLD_OUT_BLUR_RADIUS", "20", "Background blur radius"),
    ("SOLD_OUT_MARGIN", "20", "Watermark distance from the bottom-right corner"),
];

const DEF_GROUPS: &[&[DefTuple]] = &[GLITCH_DEFS, FRAME_DEFS, PIXEL_DEFS, SOLD_OUT_DEFS];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEF_GROUPS
        .iter()
        .flat_map(|defs| defs.iter())
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
