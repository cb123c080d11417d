pub mod bitmask;
pub mod image;
pub mod process;
pub mod steganography;

use log::*;
use std::fs::File;
use std::io::Write;

pub use crate::image::format::{BmpHeader, Channel, Color, FileHeader, Image, Pixel, PixelGrid};
pub use crate::image::{decode, encode, open_bitmap, save_bitmap};

pub fn init_logging() {
    let target = Box::new(File::create("log.txt").expect("Can't create file"));

    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(target))
        .filter(Some("lib_bmp"), LevelFilter::Debug)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
