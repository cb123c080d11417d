use std::fs;
use std::path::Path;

use log::{debug, error, info};
use thiserror::Error;

use super::format::{
    BmpHeader, Color, FileHeader, Image, FILE_HEADER_SIZE, MAGIC, MAX_HEADER_SIZE, MIN_HEADER_SIZE,
    PALETTE_ENTRY_SIZE,
};
use super::packing::{self, PackingError};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("missing magic bytes, not a bitmap file")]
    BadMagic,
    #[error("truncated header: need {expected} bytes, only {found} available")]
    TruncatedHeader { expected: usize, found: usize },
    #[error("declared header size {0} out of range (40..=124)")]
    InvalidHeaderSize(u32),
    #[error("unsupported bit depth {0}, expected one of 1, 4, 8, 16, 24 or 32")]
    UnsupportedBitDepth(u16),
    #[error("unsupported compression type {0}, only uncompressed data is readable")]
    UnsupportedCompression(u32),
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("truncated palette: expected {expected} bytes of entries, found {found}")]
    TruncatedPalette { expected: usize, found: usize },
    #[error("pixel data offset mismatch: header declares {declared}, headers and palette end at {actual}")]
    OffsetMismatch { declared: u32, actual: usize },
    #[error("declared image size {declared} does not match the {computed} bytes implied by the dimensions")]
    ImageSizeMismatch { declared: u32, computed: u64 },
    #[error("truncated pixel data: expected {expected} bytes, found {found}")]
    TruncatedPixelData { expected: usize, found: usize },
    #[error("unpacking pixel data failed")]
    Unpacking(#[from] PackingError),
    #[error("unable to read bitmap file")]
    Io(#[from] std::io::Error),
}

pub fn decode(data: &[u8]) -> Result<Image, DecodeError> {
    // File header and magic
    if data.len() < FILE_HEADER_SIZE + 4 {
        error!("input of {} bytes is too short for the headers", data.len());
        return Err(DecodeError::TruncatedHeader {
            expected: FILE_HEADER_SIZE + 4,
            found: data.len(),
        });
    }
    if data[0..2] != MAGIC {
        error!("invalid magic number");
        return Err(DecodeError::BadMagic);
    }
    let file_header = FileHeader::parse(&data[..FILE_HEADER_SIZE]);
    debug!(
        "file size {}, pixel data offset {}",
        file_header.file_size, file_header.pixel_offset
    );

    // The format header describes its own length; read the size field first,
    // then take that many bytes as the header
    let header_size = u32::from_le_bytes([data[14], data[15], data[16], data[17]]);
    if !(MIN_HEADER_SIZE..=MAX_HEADER_SIZE).contains(&header_size) {
        error!("cannot handle a format header of {} bytes", header_size);
        return Err(DecodeError::InvalidHeaderSize(header_size));
    }
    let header_end = FILE_HEADER_SIZE + header_size as usize;
    if data.len() < header_end {
        error!("input ends inside the format header");
        return Err(DecodeError::TruncatedHeader {
            expected: header_end,
            found: data.len(),
        });
    }
    let header = BmpHeader::parse(&data[FILE_HEADER_SIZE..header_end]);
    debug!(
        "header size {}: {}x{} at {} bpp, compression {}, {} colors",
        header.header_size,
        header.width,
        header.height,
        header.bit_per_pixel,
        header.compression,
        header.color_count
    );

    if !BmpHeader::is_supported_depth(header.bit_per_pixel) {
        error!("invalid bit depth {}", header.bit_per_pixel);
        return Err(DecodeError::UnsupportedBitDepth(header.bit_per_pixel));
    }
    if header.compression != 0 {
        error!("compressed bitmap data is not supported");
        return Err(DecodeError::UnsupportedCompression(header.compression));
    }
    if header.width == 0 || header.height == 0 {
        error!("degenerate dimensions {}x{}", header.width, header.height);
        return Err(DecodeError::InvalidDimensions {
            width: header.width,
            height: header.height,
        });
    }

    // Palette, when the header declares one
    let mut cursor = header_end;
    let mut palette = Vec::new();
    if header.color_count > 0 {
        let expected = header.color_count as usize * PALETTE_ENTRY_SIZE;
        let available = data.len() - cursor;
        if available < expected {
            error!("palette needs {} bytes, {} available", expected, available);
            return Err(DecodeError::TruncatedPalette {
                expected,
                found: available,
            });
        }
        palette = data[cursor..cursor + expected]
            .chunks_exact(PALETTE_ENTRY_SIZE)
            .map(|entry| Color {
                b: entry[0],
                g: entry[1],
                r: entry[2],
                a: entry[3],
            })
            .collect();
        cursor += expected;
        debug!("read {} palette entries", palette.len());
    }

    // The pixel data must start exactly where the file header said it would
    if cursor != file_header.pixel_offset as usize {
        error!(
            "pixel data expected at offset {}, cursor is at {}",
            file_header.pixel_offset, cursor
        );
        return Err(DecodeError::OffsetMismatch {
            declared: file_header.pixel_offset,
            actual: cursor,
        });
    }

    // Trust the declared image size only after re-deriving it
    let computed = header.computed_image_size();
    if header.image_size as u64 != computed {
        error!(
            "declared image size {} but dimensions imply {}",
            header.image_size, computed
        );
        return Err(DecodeError::ImageSizeMismatch {
            declared: header.image_size,
            computed,
        });
    }
    let expected = computed as usize;
    let available = data.len() - cursor;
    if available < expected {
        error!("pixel data needs {} bytes, {} available", expected, available);
        return Err(DecodeError::TruncatedPixelData {
            expected,
            found: available,
        });
    }

    let pixels = packing::unpack(&data[cursor..cursor + expected], &header)?;
    info!(
        "decoded a {}x{} bitmap at {} bpp",
        header.width, header.height, header.bit_per_pixel
    );

    Ok(Image {
        header,
        pixels,
        palette,
    })
}

pub fn open_bitmap<P: AsRef<Path>>(path: P) -> Result<Image, DecodeError> {
    let data = fs::read(path)?;
    decode(&data)
}
