//! High-level facade for the `bandvec-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core image types and the feature extractor,
//! - (feature `image`) helpers that decode image files with the `image` crate,
//!   run the extractor and turn the annotation into an `image::RgbImage`,
//! - (feature `cli`) the `bandvec` command-line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use bandvec::{extract, ExtractParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = ExtractParams::new(128, 4);
//! let out = extract::extract_path("page.png", &params)?;
//! println!("{}", out.features);
//! extract::annotated_to_rgb(&out.annotated)?.save("page_bands.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `bandvec::core`: grayscale buffers, views and the logger.
//! - `bandvec::features`: binarize, segment, extract features, annotate, JSON io.
//! - `bandvec::extract` (feature `image`): end-to-end helpers from files or `image::GrayImage`.

pub use bandvec_core as core;
pub use bandvec_features as features;

pub use bandvec_core::{GrayImage, GrayImageView};
pub use bandvec_features::{
    AnnotatedImage, Bands, BinaryGrid, ExtractParams, Extraction, FeatureError, FeatureExtractor,
    FeatureVectors, MarkerStyle,
};

#[cfg(feature = "image")]
pub mod extract;
