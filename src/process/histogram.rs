use crate::image::format::{Channel, PixelGrid};

const LEVELS: usize = 256;

/// Tallies the value distribution of one channel across the whole grid.
pub fn histogram(grid: &PixelGrid, channel: Channel) -> [u64; LEVELS] {
    let mut counts = [0u64; LEVELS];
    for pixel in grid.pixels() {
        counts[pixel.channel(channel) as usize] += 1;
    }
    counts
}

/// Histogram equalization of one channel: each value is remapped through
/// the scaled cumulative distribution, spreading the used range over all
/// 256 levels. The top of the scale saturates at 255.
pub fn equalize(grid: &mut PixelGrid, channel: Channel) {
    let area = grid.width() as u64 * grid.height() as u64;
    let counts = histogram(grid, channel);

    let mut cdf = [0u64; LEVELS];
    cdf[0] = counts[0];
    for i in 1..LEVELS {
        cdf[i] = cdf[i - 1] + counts[i];
    }

    let scale = LEVELS as f32 / area as f32;
    for pixel in grid.pixels_mut() {
        let value = pixel.channel(channel) as usize;
        *pixel.channel_mut(channel) = (scale * cdf[value] as f32) as u8;
    }
}
