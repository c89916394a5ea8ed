//! Writing bands back into the raster with a short cross-fade at the seam.

use image::RgbImage;

/// At most this many top rows of a band are cross-faded.
pub const MAX_BLEND_ROWS: u32 = 4;

/// Evenly spaced weights from 0 to 1 inclusive, `n` of them.
///
/// A single row gets weight 0, so it keeps the raster's existing content.
pub fn blend_ramp(n: u32) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = f64::from(n - 1);
            (0..n).map(|i| f64::from(i) / last).collect()
        }
    }
}

/// Number of seam rows for a band of `height` starting at `start_row`.
pub fn blend_rows(height: u32, start_row: u32) -> u32 {
    MAX_BLEND_ROWS.min(height).min(start_row)
}

/// Write `band` into `raster` at `start_row`.
///
/// The first [`blend_rows`] rows mix the raster's current row with the
/// band row as `old * (1 - a) + new * a`, rounded to nearest rather than
/// truncated, so weights 0 and 1 reproduce their source sample exactly even
/// under float error. The remaining rows are copied over. The first band
/// (`start_row == 0`) has no seam.
pub fn write_band(raster: &mut RgbImage, band: &RgbImage, start_row: u32) {
    let n = blend_rows(band.height(), start_row);
    let ramp = blend_ramp(n);

    for (y, row) in band.enumerate_rows() {
        let weight = ramp.get(y as usize).copied();
        for (x, _, pixel) in row {
            let target = raster.get_pixel_mut(x, start_row + y);
            match weight {
                Some(a) => {
                    for (old, new) in target.0.iter_mut().zip(pixel.0) {
                        let mixed = f64::from(*old) * (1.0 - a) + f64::from(new) * a;
                        *old = mixed.round().clamp(0.0, 255.0) as u8;
                    }
                }
                None => *target = *pixel,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn ramp_shapes() {
        assert!(blend_ramp(0).is_empty());
        assert_eq!(blend_ramp(1), vec![0.0]);
        assert_eq!(blend_ramp(2), vec![0.0, 1.0]);
        let four = blend_ramp(4);
        assert_eq!(four.len(), 4);
        assert!((four[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(four[3], 1.0);
    }

    #[test]
    fn seam_rows_limited_by_height_and_position() {
        assert_eq!(blend_rows(10, 0), 0);
        assert_eq!(blend_rows(10, 2), 2);
        assert_eq!(blend_rows(3, 50), 3);
        assert_eq!(blend_rows(10, 50), 4);
    }

    #[test]
    fn first_band_is_copied_verbatim() {
        let mut raster = RgbImage::from_pixel(3, 4, Rgb([0, 0, 0]));
        let band = RgbImage::from_pixel(3, 2, Rgb([200, 100, 50]));
        write_band(&mut raster, &band, 0);
        assert_eq!(raster.get_pixel(1, 0).0, [200, 100, 50]);
        assert_eq!(raster.get_pixel(1, 1).0, [200, 100, 50]);
        assert_eq!(raster.get_pixel(1, 2).0, [0, 0, 0]);
    }

    #[test]
    fn seam_fades_from_old_to_new() {
        let mut raster = RgbImage::from_pixel(2, 10, Rgb([100, 100, 100]));
        let band = RgbImage::from_pixel(2, 5, Rgb([130, 100, 100]));
        write_band(&mut raster, &band, 4);

        let reds: Vec<u8> = (4..9).map(|y| raster.get_pixel(0, y)[0]).collect();
        assert_eq!(reds, vec![100, 110, 120, 130, 130]);
        assert_eq!(raster.get_pixel(0, 3)[0], 100);
    }

    #[test]
    fn single_seam_row_keeps_old_content() {
        let mut raster = RgbImage::from_pixel(1, 3, Rgb([10, 20, 30]));
        let band = RgbImage::from_pixel(1, 2, Rgb([90, 90, 90]));
        write_band(&mut raster, &band, 1);
        assert_eq!(raster.get_pixel(0, 1).0, [10, 20, 30]);
        assert_eq!(raster.get_pixel(0, 2).0, [90, 90, 90]);
    }

    #[test]
    fn seam_rounds_to_nearest() {
        let mut raster = RgbImage::from_pixel(1, 8, Rgb([0, 0, 0]));
        let band = RgbImage::from_pixel(1, 4, Rgb([1, 1, 1]));
        write_band(&mut raster, &band, 4);

        // weights 0, 1/3, 2/3, 1: the 2/3 row rounds up where truncation would give 0
        let reds: Vec<u8> = (4..8).map(|y| raster.get_pixel(0, y)[0]).collect();
        assert_eq!(reds, vec![0, 0, 1, 1]);
    }
}
