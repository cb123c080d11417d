//! Hides a byte string in the parity of the color channels of a decoded
//! image.
//!
//! Every channel byte carries one payload bit as its evenness (even = 0,
//! odd = 1), so the change to the picture is a single intensity step per
//! channel at most. Channels are visited bottom row first, left to right,
//! blue then green then red within each pixel; the auxiliary slot is never
//! touched. The first 32 bits carry the payload length, then the payload
//! itself follows with a trailing NUL byte, and every channel after it is
//! set to random parity so the payload has no visible boundary.
//!
//! Only images with 16 or more bits per pixel qualify: below that the
//! channel bytes are packed sub-byte fields, not color intensities.

use log::{debug, error, info};
use rand::Rng;
use thiserror::Error;

use crate::image::format::{Image, Pixel};

/// Bits reserved at the head of the traversal for the length prefix.
const LENGTH_BITS: usize = 32;

/// Carrier channels per pixel (blue, green, red).
const CHANNELS_PER_PIXEL: u64 = 3;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("embedding requires at least 16 bits per pixel, image has {0}")]
    UnsupportedBitDepth(u16),
    #[error("payload of {len} bytes exceeds the {capacity} byte capacity of this image")]
    PayloadTooLarge { len: usize, capacity: usize },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("extraction requires at least 16 bits per pixel, image has {0}")]
    UnsupportedBitDepth(u16),
    #[error("declared payload of {len} bytes exceeds the {capacity} byte capacity, nothing embedded")]
    InvalidPayloadLength { len: usize, capacity: usize },
}

/// Payload capacity in whole bytes once the length prefix is accounted for.
pub fn capacity_bytes(width: u32, height: u32) -> usize {
    let bits = CHANNELS_PER_PIXEL * width as u64 * height as u64;
    (bits.saturating_sub(LENGTH_BITS as u64) / 8) as usize
}

/// Sets the parity of one carrier channel to `bit` without visibly moving
/// its value: a channel already at 255 is stepped down first so the upward
/// parity adjustment cannot overflow.
fn encode_bit(channel: &mut u8, bit: u8) {
    if *channel == u8::MAX {
        *channel -= 1;
    }
    *channel += (*channel % 2 + bit) % 2;
}

/// Embeds `message` plus a trailing NUL terminator into the image.
///
/// An oversized payload is rejected up front and leaves the pixels
/// untouched. The `rng` supplies the parity noise for the channels behind
/// the payload; inject a seeded generator for reproducible output.
pub fn embed<R: Rng>(image: &mut Image, message: &[u8], rng: &mut R) -> Result<(), EmbedError> {
    let capacity = capacity_bytes(image.pixels.width(), image.pixels.height());
    let len = message.len() + 1; // the terminator travels with the message
    if len > capacity {
        error!("payload of {} bytes exceeds capacity of {}", len, capacity);
        return Err(EmbedError::PayloadTooLarge { len, capacity });
    }
    if image.header.bit_per_pixel < 16 {
        error!("cannot embed into {} bpp pixels", image.header.bit_per_pixel);
        return Err(EmbedError::UnsupportedBitDepth(image.header.bit_per_pixel));
    }
    debug!("embedding {} of {} payload bytes", len, capacity);

    // Length prefix, then message and terminator, all least significant
    // bit first
    let len32 = len as u32;
    let length_bits = (0..LENGTH_BITS).map(move |k| ((len32 >> k) & 1) as u8);
    let message_bits = message
        .iter()
        .chain(std::iter::once(&0u8))
        .flat_map(|&byte| (0..8).map(move |k| (byte >> k) & 1));
    let mut payload = length_bits.chain(message_bits);

    let channels = image.pixels.pixels_mut().iter_mut().flat_map(|pixel| {
        let Pixel { b, g, r, .. } = pixel;
        [b, g, r]
    });
    for channel in channels {
        match payload.next() {
            Some(bit) => encode_bit(channel, bit),
            // past the payload: random parity, so the end of the message
            // is not marked by a run of untouched bytes
            None => encode_bit(channel, rng.random::<bool>() as u8),
        }
    }

    info!("embedded a {} byte payload", len);
    Ok(())
}

/// Reads back a payload embedded by [`embed`], terminator included.
///
/// A declared length beyond the image capacity means no valid message is
/// present. A length that happens to pass the check on a message-less image
/// decodes to garbage; distinguishing that case needs an integrity marker
/// inside the payload and is up to the caller.
pub fn extract(image: &Image) -> Result<Vec<u8>, ExtractError> {
    if image.header.bit_per_pixel < 16 {
        error!("cannot extract from {} bpp pixels", image.header.bit_per_pixel);
        return Err(ExtractError::UnsupportedBitDepth(image.header.bit_per_pixel));
    }
    let capacity = capacity_bytes(image.pixels.width(), image.pixels.height());

    let mut parities = image
        .pixels
        .pixels()
        .iter()
        .flat_map(|pixel| [pixel.b, pixel.g, pixel.r])
        .map(|channel| channel % 2);

    let mut len: u32 = 0;
    for k in 0..LENGTH_BITS {
        if let Some(bit) = parities.next() {
            len |= (bit as u32) << k;
        }
    }
    let len = len as usize;
    if len > capacity {
        error!("declared length {} exceeds capacity {}", len, capacity);
        return Err(ExtractError::InvalidPayloadLength { len, capacity });
    }
    debug!("reading a {} byte payload", len);

    // len <= capacity guarantees the parities iterator holds enough bits
    let mut message = Vec::with_capacity(len);
    for _ in 0..len {
        let mut byte = 0u8;
        for k in 0..8 {
            if let Some(bit) = parities.next() {
                byte |= bit << k;
            }
        }
        message.push(byte);
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::format::Image;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn carrier(width: u32, height: u32) -> Image {
        let mut image = Image::new(width, height, 24, 0).unwrap();
        for (i, pixel) in image.pixels.pixels_mut().iter_mut().enumerate() {
            pixel.b = (i * 3) as u8;
            pixel.g = (i * 5) as u8;
            pixel.r = (i * 7) as u8;
        }
        image
    }

    #[test]
    fn test_embed_extract_roundtrip() {
        let mut image = carrier(10, 10);
        let mut rng = StdRng::seed_from_u64(42);

        embed(&mut image, b"hello", &mut rng).unwrap();
        assert_eq!(extract(&image).unwrap(), b"hello\0");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let mut image = carrier(8, 8);
        let mut rng = StdRng::seed_from_u64(7);
        embed(&mut image, b"stable", &mut rng).unwrap();

        let first = extract(&image).unwrap();
        let second = extract(&image).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_capacity_boundary() {
        // 10x10 at 3 channels: 268 usable bits after the prefix, 33 bytes
        assert_eq!(capacity_bytes(10, 10), 33);

        // 33 content bytes + terminator = 34 > 33: rejected untouched
        let mut image = carrier(10, 10);
        let pristine = image.clone();
        let mut rng = StdRng::seed_from_u64(1);
        let result = embed(&mut image, &[b'x'; 33], &mut rng);
        assert!(matches!(
            result,
            Err(EmbedError::PayloadTooLarge { len: 34, capacity: 33 })
        ));
        assert_eq!(image, pristine);

        // one byte fewer fits
        let mut rng = StdRng::seed_from_u64(1);
        embed(&mut image, &[b'x'; 32], &mut rng).unwrap();
        let mut expected = vec![b'x'; 32];
        expected.push(0);
        assert_eq!(extract(&image).unwrap(), expected);
    }

    #[test]
    fn test_rejects_low_bit_depth() {
        let mut image = Image::new(16, 16, 8, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            embed(&mut image, b"hi", &mut rng),
            Err(EmbedError::UnsupportedBitDepth(8))
        ));
        assert!(matches!(
            extract(&image),
            Err(ExtractError::UnsupportedBitDepth(8))
        ));
    }

    #[test]
    fn test_saturated_channels_still_carry_parity() {
        let mut image = Image::new(6, 6, 24, 0).unwrap();
        for pixel in image.pixels.pixels_mut() {
            pixel.b = 255;
            pixel.g = 255;
            pixel.r = 255;
        }
        let mut rng = StdRng::seed_from_u64(9);
        embed(&mut image, b"max", &mut rng).unwrap();
        assert_eq!(extract(&image).unwrap(), b"max\0");
        // no channel may have wrapped around
        assert!(image
            .pixels
            .pixels()
            .iter()
            .all(|p| p.b >= 254 && p.g >= 254 && p.r >= 254));
    }

    #[test]
    fn test_interior_nul_bytes_survive() {
        let mut image = carrier(12, 12);
        let mut rng = StdRng::seed_from_u64(11);
        embed(&mut image, b"a\0b", &mut rng).unwrap();
        assert_eq!(extract(&image).unwrap(), b"a\0b\0");
    }
}
