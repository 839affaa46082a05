//! Visualization of the binary grid with band boundaries.

use serde::{Deserialize, Serialize};

use crate::binarize::{DARK_VALUE, LIGHT_VALUE};
use crate::params::MarkerStyle;
use crate::{segment, BinaryGrid, FeatureError};

/// RGB8 image, row-major, 3 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl AnnotatedImage {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    fn paint_column(&mut self, x: usize, color: [u8; 3]) {
        for y in 0..self.height {
            let i = (y * self.width + x) * 3;
            self.data[i..i + 3].copy_from_slice(&color);
        }
    }
}

/// Columns covered by a marker of `thickness` pixels centred on `x`,
/// clipped to `[0, width)`.
fn marker_columns(x: usize, thickness: u32, width: usize) -> std::ops::Range<usize> {
    let thickness = thickness as usize;
    let start = x.saturating_sub(thickness / 2);
    let end = (start + thickness).min(width);
    start..end
}

/// Render the grid in black/white and draw a vertical marker at every
/// internal band boundary.
///
/// The whole grid is rendered, including remainder columns that no band
/// covers.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(grid, style))
)]
pub fn annotate(
    grid: &BinaryGrid,
    segments: usize,
    style: &MarkerStyle,
) -> Result<AnnotatedImage, FeatureError> {
    let bands = segment(grid, segments)?;

    let mut data = Vec::with_capacity(grid.width() * grid.height() * 3);
    for y in 0..grid.height() {
        for &dark in grid.row(y) {
            let v = if dark { DARK_VALUE } else { LIGHT_VALUE };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    let mut out = AnnotatedImage {
        width: grid.width(),
        height: grid.height(),
        data,
    };

    for x in bands.boundaries() {
        for col in marker_columns(x, style.thickness, out.width) {
            out.paint_column(col, style.color);
        }
    }
    Ok(out)
}
