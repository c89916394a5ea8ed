//! Cyclic shifts (rolls) with wrap-around, never zero-fill.
//!
//! A positive offset moves content toward higher indices: the sample at
//! index `i` lands at `(i + offset) mod len`.

use image::RgbImage;

fn wrap(index: u32, offset: i64, len: u32) -> u32 {
    (i64::from(index) + offset).rem_euclid(i64::from(len)) as u32
}

/// Roll every row of `img` sideways by `offset` columns, all channels together.
pub fn roll_columns(img: &RgbImage, offset: i64) -> RgbImage {
    let width = img.width();
    if width == 0 || offset.rem_euclid(i64::from(width)) == 0 {
        return img.clone();
    }
    let mut out = RgbImage::new(width, img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        out.put_pixel(wrap(x, offset, width), y, *pixel);
    }
    out
}

/// Roll one channel sideways by `offset` columns, leaving the others in place.
pub fn roll_channel_columns(img: &mut RgbImage, channel: usize, offset: i64) {
    let (width, height) = img.dimensions();
    if width == 0 || offset.rem_euclid(i64::from(width)) == 0 {
        return;
    }
    let mut line = vec![0u8; width as usize];
    for y in 0..height {
        for x in 0..width {
            line[wrap(x, offset, width) as usize] = img.get_pixel(x, y)[channel];
        }
        for x in 0..width {
            img.get_pixel_mut(x, y)[channel] = line[x as usize];
        }
    }
}

/// Roll one channel vertically by `offset` rows, leaving the others in place.
pub fn roll_channel_rows(img: &mut RgbImage, channel: usize, offset: i64) {
    let (width, height) = img.dimensions();
    if height == 0 || offset.rem_euclid(i64::from(height)) == 0 {
        return;
    }
    let mut column = vec![0u8; height as usize];
    for x in 0..width {
        for y in 0..height {
            column[wrap(y, offset, height) as usize] = img.get_pixel(x, y)[channel];
        }
        for y in 0..height {
            img.get_pixel_mut(x, y)[channel] = column[y as usize];
        }
    }
}
