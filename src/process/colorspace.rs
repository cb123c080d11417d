//! RGB <-> Y'CbCr conversion in place on the pixel grid.
//!
//! The converted components reuse the color slots positionally: Y lands in
//! the blue slot, Cb in the green slot, Cr in the red slot. Casts saturate,
//! so out-of-range intermediate values clip to the 0..=255 scale.

use crate::image::format::PixelGrid;

/// Y  = 0.299 R + 0.587 G + 0.114 B
/// Cb = 128 + 0.564 (B - Y)
/// Cr = 128 + 0.713 (R - Y)
pub fn rgb_to_ycbcr(grid: &mut PixelGrid) {
    for pixel in grid.pixels_mut() {
        let (b, g, r) = (pixel.b as f32, pixel.g as f32, pixel.r as f32);
        let y = 0.299 * r + 0.587 * g + 0.114 * b;

        pixel.b = y as u8;
        pixel.g = (128.0 + 0.564 * (b - y)) as u8;
        pixel.r = (128.0 + 0.713 * (r - y)) as u8;
    }
}

/// R = Y + 1.402 (Cr - 128)
/// G = Y - 0.34414 (Cb - 128) - 0.71414 (Cr - 128)
/// B = Y + 1.772 (Cb - 128)
pub fn ycbcr_to_rgb(grid: &mut PixelGrid) {
    for pixel in grid.pixels_mut() {
        let (y, cb, cr) = (pixel.b as f32, pixel.g as f32, pixel.r as f32);

        pixel.r = (y + 1.402 * (cr - 128.0)) as u8;
        pixel.g = (y - 0.34414 * (cb - 128.0) - 0.71414 * (cr - 128.0)) as u8;
        pixel.b = (y + 1.772 * (cb - 128.0)) as u8;
    }
}
