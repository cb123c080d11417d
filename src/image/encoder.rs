use std::fs;
use std::path::Path;

use log::{debug, error, info};
use thiserror::Error;

use super::format::{BmpHeader, FileHeader, Image, FILE_HEADER_SIZE, PALETTE_ENTRY_SIZE};
use super::packing::{self, PackingError};

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("unsupported bit depth {0}, expected one of 1, 4, 8, 16, 24 or 32")]
    UnsupportedBitDepth(u16),
    #[error("image data of {0} bytes exceeds the format's 32 bit size field")]
    ImageTooLarge(u64),
    #[error("packing pixel data failed")]
    Packing(#[from] PackingError),
    #[error("unable to write bitmap file")]
    WriteFailed(#[from] std::io::Error),
}

pub fn encode(image: &Image) -> Result<Vec<u8>, EncodeError> {
    if !BmpHeader::is_supported_depth(image.header.bit_per_pixel) {
        error!("invalid bit depth {}", image.header.bit_per_pixel);
        return Err(EncodeError::UnsupportedBitDepth(image.header.bit_per_pixel));
    }

    // Every derived field is recomputed from the grid and palette as they
    // are now; sizes carried in from an earlier decode may be stale
    let mut header = image.header;
    header.width = image.pixels.width();
    header.height = image.pixels.height();
    header.color_count = image.palette.len() as u32;

    let computed = header.computed_image_size();
    header.image_size = u32::try_from(computed).map_err(|_| {
        error!("image data of {} bytes does not fit the size field", computed);
        EncodeError::ImageTooLarge(computed)
    })?;

    let header_bytes = header.to_bytes();
    let pixel_offset = FILE_HEADER_SIZE + header_bytes.len() + image.palette.len() * PALETTE_ENTRY_SIZE;
    let file_size = pixel_offset + header.image_size as usize;
    let file_header = FileHeader {
        file_size: file_size as u32,
        reserved1: 0,
        reserved2: 0,
        pixel_offset: pixel_offset as u32,
    };
    debug!(
        "writing {}x{} at {} bpp: {} header bytes, {} palette entries, {} pixel bytes",
        header.width,
        header.height,
        header.bit_per_pixel,
        header_bytes.len(),
        image.palette.len(),
        header.image_size
    );

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(&file_header.to_bytes());
    out.extend_from_slice(&header_bytes);
    for color in &image.palette {
        out.extend_from_slice(&[color.b, color.g, color.r, color.a]);
    }
    debug_assert_eq!(out.len(), pixel_offset);

    let data = packing::pack(&image.pixels, &header)?;
    out.extend_from_slice(&data);

    info!("encoded {} bytes", out.len());
    Ok(out)
}

pub fn save_bitmap<P: AsRef<Path>>(image: &Image, path: P) -> Result<(), EncodeError> {
    let data = encode(image)?;
    fs::write(path, data)?;
    Ok(())
}
