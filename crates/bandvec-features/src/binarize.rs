//! Global-threshold binarization.

use bandvec_core::{GrayImage, GrayImageView, ImageError};
use serde::{Deserialize, Serialize};

use crate::params::threshold_u8;
use crate::FeatureError;

/// Intensity a dark cell renders with.
pub const DARK_VALUE: u8 = 0;
/// Intensity a light cell renders with.
pub const LIGHT_VALUE: u8 = 255;

/// Dark/light classification of every pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BinaryGridRepr")]
pub struct BinaryGrid {
    width: usize,
    height: usize,
    dark: Vec<bool>,
}

#[derive(Deserialize)]
struct BinaryGridRepr {
    width: usize,
    height: usize,
    dark: Vec<bool>,
}

impl TryFrom<BinaryGridRepr> for BinaryGrid {
    type Error = FeatureError;

    fn try_from(repr: BinaryGridRepr) -> Result<Self, Self::Error> {
        let expected = repr
            .width
            .checked_mul(repr.height)
            .ok_or(ImageError::InvalidDimensions {
                width: repr.width,
                height: repr.height,
            })?;
        if repr.dark.len() != expected {
            return Err(ImageError::InvalidGrayBuffer {
                expected,
                got: repr.dark.len(),
            }
            .into());
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            dark: repr.dark,
        })
    }
}

impl BinaryGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.dark[y * self.width + x]
    }

    /// Dark flags of row `y`.
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[bool] {
        let start = y * self.width;
        &self.dark[start..start + self.width]
    }

    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|&&d| d).count()
    }

    /// Render as a 0/255 grayscale image.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self
                .dark
                .iter()
                .map(|&d| if d { DARK_VALUE } else { LIGHT_VALUE })
                .collect(),
        }
    }
}

/// Classify every pixel as dark (`value <= threshold`) or light.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(image),
        fields(width = image.width, height = image.height)
    )
)]
pub fn binarize(image: &GrayImageView<'_>, threshold: i32) -> Result<BinaryGrid, FeatureError> {
    if image.is_empty() {
        return Err(FeatureError::EmptyImage {
            width: image.width,
            height: image.height,
        });
    }
    let threshold = threshold_u8(threshold)?;
    // Re-validate so a hand-built view with a short buffer cannot panic below.
    let image = GrayImageView::new(image.width, image.height, image.data)?;

    let dark = image.data.iter().map(|&v| v <= threshold).collect();
    Ok(BinaryGrid {
        width: image.width,
        height: image.height,
        dark,
    })
}
