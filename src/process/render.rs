use thiserror::Error;

use crate::image::format::Image;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("ascii rendering needs a two color image, this one declares {0} colors")]
    UnsupportedColorCount(u32),
}

/// Renders a two color image as ASCII art, one text line per scanline.
///
/// Scanlines are stored bottom-up, so rows are emitted in reverse to put
/// the top of the image on the first line. A set pixel prints as `*`.
pub fn ascii_art(image: &Image) -> Result<String, RenderError> {
    if image.header.color_count != 2 {
        return Err(RenderError::UnsupportedColorCount(image.header.color_count));
    }

    let grid = &image.pixels;
    let mut out = String::with_capacity((grid.width() as usize + 1) * grid.height() as usize);
    for row in (0..grid.height()).rev() {
        for pixel in grid.row(row) {
            out.push(if pixel.aux != 0 { '*' } else { ' ' });
        }
        out.push('\n');
    }
    Ok(out)
}
