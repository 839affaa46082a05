//! Vertical band layout.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::params::MIN_SEGMENTS;
use crate::{BinaryGrid, FeatureError};

/// Equal-width vertical bands laid over an image of width `image_width`.
///
/// Band `i` spans columns `[i * band_width, (i + 1) * band_width)`. When the
/// width is not divisible by the band count, the remainder columns on the
/// right belong to no band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BandsRepr")]
pub struct Bands {
    count: usize,
    band_width: usize,
    image_width: usize,
}

/// Unchecked wire form of [`Bands`].
#[derive(Deserialize)]
struct BandsRepr {
    count: usize,
    band_width: usize,
    image_width: usize,
}

impl TryFrom<BandsRepr> for Bands {
    type Error = FeatureError;

    fn try_from(repr: BandsRepr) -> Result<Self, Self::Error> {
        let bands = Bands::new(repr.image_width, repr.count)?;
        if bands.band_width != repr.band_width {
            return Err(FeatureError::BandsMismatch {
                bands_width: repr.count.saturating_mul(repr.band_width),
                grid_width: repr.image_width,
            });
        }
        Ok(bands)
    }
}

impl Bands {
    /// Lay out `segments` bands over `image_width` columns.
    pub fn new(image_width: usize, segments: usize) -> Result<Self, FeatureError> {
        if segments < MIN_SEGMENTS {
            return Err(FeatureError::TooFewSegments { segments });
        }
        let band_width = image_width / segments;
        if band_width == 0 {
            return Err(FeatureError::SegmentsExceedWidth {
                segments,
                width: image_width,
            });
        }
        Ok(Self {
            count: segments,
            band_width,
            image_width,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn band_width(&self) -> usize {
        self.band_width
    }

    pub fn image_width(&self) -> usize {
        self.image_width
    }

    /// Column range of band `i`, or `None` past the last band.
    pub fn band(&self, i: usize) -> Option<Range<usize>> {
        (i < self.count).then(|| i * self.band_width..(i + 1) * self.band_width)
    }

    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.count).map(move |i| i * self.band_width..(i + 1) * self.band_width)
    }

    /// Columns where one band ends and the next begins.
    pub fn boundaries(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.count).map(move |i| i * self.band_width)
    }

    /// Number of columns covered by some band.
    pub fn covered_width(&self) -> usize {
        self.count * self.band_width
    }

    /// Number of right-edge columns left out of every band.
    pub fn excluded_columns(&self) -> usize {
        self.image_width - self.covered_width()
    }

    /// Band index owning column `x`, if any.
    pub fn band_of(&self, x: usize) -> Option<usize> {
        (x < self.covered_width()).then(|| x / self.band_width)
    }
}

/// Split a binary grid into `segments` vertical bands.
pub fn segment(grid: &BinaryGrid, segments: usize) -> Result<Bands, FeatureError> {
    let bands = Bands::new(grid.width(), segments)?;
    if bands.excluded_columns() > 0 {
        log::debug!(
            "band width {} leaves {} of {} columns outside every band",
            bands.band_width(),
            bands.excluded_columns(),
            grid.width()
        );
    }
    Ok(bands)
}
