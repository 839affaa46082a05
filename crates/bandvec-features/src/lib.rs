//! Band-density features of grayscale images.
//!
//! The pipeline is a single pass over the pixels:
//! 1. [`binarize`]: a pixel is dark when `value <= threshold`.
//! 2. [`segment`]: split the width into `segments` equal vertical bands of
//!    width `floor(width / segments)`. Remainder columns on the right belong
//!    to no band.
//! 3. [`extract_features`]: count dark pixels per band, then normalize the
//!    counts by their sum and by their maximum. An image without dark pixels
//!    inside the bands yields all-zero normalized vectors and sets
//!    [`FeatureVectors::degenerate`].
//! 4. [`annotate`]: render the binary grid with a marker at each internal
//!    band boundary.
//!
//! [`FeatureExtractor`] runs all four stages. Every call is independent.
//!
//! ```
//! use bandvec_core::GrayImage;
//! use bandvec_features::extract;
//!
//! let img = GrayImage::from_rows(&[[0u8, 0, 200, 200], [0, 0, 200, 200]]).unwrap();
//! let out = extract(&img.view(), 128, 2).unwrap();
//! assert_eq!(out.features.raw, vec![4, 0]);
//! assert_eq!(out.features.sum_normalized, vec![1.0, 0.0]);
//! ```

mod annotate;
mod binarize;
mod error;
mod extractor;
mod features;
pub mod io;
mod params;
mod segment;

pub use annotate::{annotate, AnnotatedImage};
pub use binarize::{binarize, BinaryGrid, DARK_VALUE, LIGHT_VALUE};
pub use error::FeatureError;
pub use extractor::{extract, Extraction, FeatureExtractor};
pub use features::{extract_features, FeatureVectors};
pub use params::{ExtractParams, MarkerStyle, MIN_SEGMENTS, SUGGESTED_MAX_SEGMENTS};
pub use segment::{segment, Bands};
