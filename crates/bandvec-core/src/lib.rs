//! Core types for band-density feature extraction.
//!
//! This crate is intentionally small: grayscale buffers and their views plus
//! the logger used by the binaries. It does *not* depend on any image codec.

mod image;
mod logger;

pub use image::{GrayImage, GrayImageView, ImageError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_str, init_with_level};
