//! Median-cut color quantization.

use std::collections::BTreeMap;

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::{ProcessError, Result};

/// Maximum palette size, matching 8-bit indexed images.
pub const MAX_COLORS: usize = 256;

/// A fixed set of colors an image can be mapped onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

/// Unique colors with their pixel counts.
type ColorCount = ([u8; 3], u64);

impl Palette {
    /// Build a palette directly from a list of colors.
    pub fn from_colors(colors: Vec<Rgb<u8>>) -> Self {
        Self { colors }
    }

    /// Build a palette of at most `max_colors` entries by median cut.
    ///
    /// The box with the widest channel range is split at its pixel-weighted
    /// median until the palette is full or no box can be split further.
    /// Each box contributes its pixel-weighted mean color.
    pub fn median_cut(img: &RgbImage, max_colors: usize) -> Result<Self> {
        if !(1..=MAX_COLORS).contains(&max_colors) {
            return Err(ProcessError::InvalidParameter {
                name: "colors",
                reason: format!("must be between 1 and {MAX_COLORS}, got {max_colors}"),
            });
        }

        // BTreeMap keeps the traversal order, and therefore the palette, stable
        let mut histogram: BTreeMap<[u8; 3], u64> = BTreeMap::new();
        for pixel in img.pixels() {
            *histogram.entry(pixel.0).or_insert(0) += 1;
        }
        if histogram.is_empty() {
            return Ok(Self { colors: Vec::new() });
        }

        let mut boxes: Vec<Vec<ColorCount>> = vec![histogram.into_iter().collect()];
        while boxes.len() < max_colors {
            let Some((index, channel)) = widest_box(&boxes) else {
                break;
            };
            let entries = boxes.swap_remove(index);
            let (low, high) = split_box(entries, channel);
            boxes.push(low);
            boxes.push(high);
        }

        let mut colors: Vec<Rgb<u8>> = boxes.iter().map(|b| mean_color(b)).collect();
        colors.sort_by_key(|c| c.0);
        colors.dedup();
        debug!(requested = max_colors, built = colors.len(), "Built median-cut palette");

        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Closest palette color by squared Euclidean distance; ties go to the
    /// earlier entry. An empty palette returns black.
    pub fn nearest(&self, wanted: [i32; 3]) -> Rgb<u8> {
        self.colors
            .iter()
            .min_by_key(|c| {
                (0..3)
                    .map(|i| {
                        let d = wanted[i] - i32::from(c[i]);
                        d * d
                    })
                    .sum::<i32>()
            })
            .copied()
            .unwrap_or(Rgb([0, 0, 0]))
    }

    /// Replace every pixel with its nearest palette color.
    pub fn remap(&self, img: &RgbImage) -> RgbImage {
        let mut out = img.clone();
        for pixel in out.pixels_mut() {
            let [r, g, b] = pixel.0;
            *pixel = self.nearest([i32::from(r), i32::from(g), i32::from(b)]);
        }
        out
    }
}

/// Box with the largest single-channel range among boxes holding more than
/// one distinct color, plus that channel.
fn widest_box(boxes: &[Vec<ColorCount>]) -> Option<(usize, usize)> {
    boxes
        .iter()
        .enumerate()
        .filter(|(_, b)| b.len() > 1)
        .map(|(i, b)| {
            let (channel, range) = (0..3)
                .map(|c| {
                    let min = b.iter().map(|(rgb, _)| rgb[c]).min().unwrap_or(0);
                    let max = b.iter().map(|(rgb, _)| rgb[c]).max().unwrap_or(0);
                    (c, max - min)
                })
                .max_by_key(|&(c, range)| (range, std::cmp::Reverse(c)))
                .unwrap_or((0, 0));
            (i, channel, range)
        })
        .max_by_key(|&(i, _, range)| (range, std::cmp::Reverse(i)))
        .map(|(i, channel, _)| (i, channel))
}

/// Split at the pixel-weighted median along `channel`. Both halves are non-empty.
fn split_box(mut entries: Vec<ColorCount>, channel: usize) -> (Vec<ColorCount>, Vec<ColorCount>) {
    entries.sort_by_key(|(rgb, _)| (rgb[channel], *rgb));
    let total: u64 = entries.iter().map(|(_, n)| n).sum();

    let mut cumulative = 0u64;
    let mut split = entries.len() - 1;
    for (i, (_, count)) in entries.iter().enumerate() {
        cumulative += count;
        if cumulative * 2 >= total {
            split = i + 1;
            break;
        }
    }
    let split = split.clamp(1, entries.len() - 1);

    let high = entries.split_off(split);
    (entries, high)
}

fn mean_color(entries: &[ColorCount]) -> Rgb<u8> {
    let total: u64 = entries.iter().map(|(_, n)| n).sum::<u64>().max(1);
    let channel = |c: usize| {
        let sum: u64 = entries.iter().map(|(rgb, n)| u64::from(rgb[c]) * n).sum();
        ((sum + total / 2) / total) as u8
    };
    Rgb([channel(0), channel(1), channel(2)])
}
