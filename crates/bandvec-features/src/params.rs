use serde::{Deserialize, Serialize};

use crate::FeatureError;

/// Smallest accepted band count.
pub const MIN_SEGMENTS: usize = 2;
/// Upper end of the band count range offered to interactive users. The
/// extractor itself accepts any count up to the image width.
pub const SUGGESTED_MAX_SEGMENTS: usize = 10;

/// Appearance of the band boundary markers in the annotated image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// RGB color of the boundary lines.
    pub color: [u8; 3],
    /// Line thickness in pixels; `0` disables the markers.
    pub thickness: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            thickness: 2,
        }
    }
}

/// Parameters of one extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractParams {
    /// Pixels with `value <= threshold` are dark. Must lie in `[0, 255]`.
    #[serde(default = "default_threshold")]
    pub threshold: i32,
    /// Number of vertical bands, at least 2 and at most the image width.
    #[serde(default = "default_segments")]
    pub segments: usize,
    #[serde(default)]
    pub marker: MarkerStyle,
}

fn default_threshold() -> i32 {
    127
}

fn default_segments() -> usize {
    4
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            segments: default_segments(),
            marker: MarkerStyle::default(),
        }
    }
}

impl ExtractParams {
    pub fn new(threshold: i32, segments: usize) -> Self {
        Self {
            threshold,
            segments,
            ..Self::default()
        }
    }

    /// Check the image-independent constraints.
    ///
    /// The `segments <= width` constraint can only be checked once the image
    /// is known and is left to [`crate::segment`].
    pub fn validate(&self) -> Result<(), FeatureError> {
        threshold_u8(self.threshold)?;
        if self.segments < MIN_SEGMENTS {
            return Err(FeatureError::TooFewSegments {
                segments: self.segments,
            });
        }
        Ok(())
    }
}

pub(crate) fn threshold_u8(threshold: i32) -> Result<u8, FeatureError> {
    u8::try_from(threshold).map_err(|_| FeatureError::ThresholdOutOfRange { threshold })
}
