pub mod colorspace;
pub mod histogram;
pub mod render;

pub use colorspace::{rgb_to_ycbcr, ycbcr_to_rgb};
pub use histogram::{equalize, histogram};
pub use render::ascii_art;
