#![allow(dead_code)]

use lib_bmp::{Color, Image};

/// 4x3 two-color checkerboard, palette index per pixel.
pub fn bilevel_1bpp() -> Image {
    let mut image = Image::new(4, 3, 1, 2).unwrap();
    image.palette[1] = Color {
        b: 255,
        g: 255,
        r: 255,
        a: 0,
    };
    for row in 0..3 {
        for col in 0..4 {
            image.pixels.pixel_mut(row, col).aux = ((row + col) % 2) as u8;
        }
    }
    image
}

/// 5x3 indexed image with an odd width, exercising the half-filled last
/// byte of each row.
pub fn indexed_4bpp() -> Image {
    let mut image = Image::new(5, 3, 4, 16).unwrap();
    for (i, color) in image.palette.iter_mut().enumerate() {
        color.r = (i * 17) as u8;
    }
    for row in 0..3 {
        for col in 0..5 {
            image.pixels.pixel_mut(row, col).aux = ((row * 5 + col) % 16) as u8;
        }
    }
    image
}

/// 6x2 indexed image with a 64 entry gray ramp palette.
pub fn indexed_8bpp() -> Image {
    let mut image = Image::new(6, 2, 8, 64).unwrap();
    for (i, color) in image.palette.iter_mut().enumerate() {
        let level = (i * 4) as u8;
        *color = Color {
            b: level,
            g: level,
            r: level,
            a: 0,
        };
    }
    for (i, pixel) in image.pixels.pixels_mut().iter_mut().enumerate() {
        pixel.aux = ((i * 7) % 64) as u8;
    }
    image
}

/// 7x3 masked image; channel values stay inside the 5 bit range the
/// default X1R5G5B5 masks can hold.
pub fn masked_16bpp() -> Image {
    let mut image = Image::new(7, 3, 16, 0).unwrap();
    for (i, pixel) in image.pixels.pixels_mut().iter_mut().enumerate() {
        pixel.b = (i % 32) as u8;
        pixel.g = ((i * 3) % 32) as u8;
        pixel.r = ((i * 5) % 32) as u8;
    }
    image
}

/// True color image of the given size with a deterministic pattern.
pub fn truecolor_24bpp(width: u32, height: u32) -> Image {
    let mut image = Image::new(width, height, 24, 0).unwrap();
    for (i, pixel) in image.pixels.pixels_mut().iter_mut().enumerate() {
        pixel.b = (i * 3) as u8;
        pixel.g = (i * 5) as u8;
        pixel.r = (i * 7) as u8;
    }
    image
}

/// 3x5 image carrying all four channels under the default 8888 masks.
pub fn masked_32bpp() -> Image {
    let mut image = Image::new(3, 5, 32, 0).unwrap();
    for (i, pixel) in image.pixels.pixels_mut().iter_mut().enumerate() {
        pixel.b = (i * 11) as u8;
        pixel.g = (i * 13) as u8;
        pixel.r = (i * 17) as u8;
        pixel.aux = (i * 19) as u8;
    }
    image
}
