//! Per-band dark-pixel counts and their normalizations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Bands, BinaryGrid, FeatureError};

/// Feature vectors of one extraction, one entry per band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVectors {
    /// Dark-pixel count of each band.
    pub raw: Vec<u64>,
    /// `raw[i] / sum(raw)`.
    pub sum_normalized: Vec<f64>,
    /// `raw[i] / max(raw)`.
    pub max_normalized: Vec<f64>,
    /// No band contains a dark pixel. Both normalized vectors are then all
    /// zeros instead of undefined.
    pub degenerate: bool,
}

impl FeatureVectors {
    /// Normalize a raw count vector.
    pub fn from_raw(raw: Vec<u64>) -> Self {
        let total: u64 = raw.iter().sum();
        let peak = raw.iter().copied().max().unwrap_or(0);
        let degenerate = total == 0;

        let scale = |denom: u64| -> Vec<f64> {
            if denom == 0 {
                vec![0.0; raw.len()]
            } else {
                raw.iter().map(|&c| c as f64 / denom as f64).collect()
            }
        };
        let sum_normalized = scale(total);
        let max_normalized = scale(peak);

        Self {
            raw,
            sum_normalized,
            max_normalized,
            degenerate,
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn total_dark(&self) -> u64 {
        self.raw.iter().sum()
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, values: &[f64]) -> fmt::Result {
    write!(f, "{label}: [")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v:.2}")?;
    }
    write!(f, "]")
}

/// Three lines: absolute counts, sum-normalized, max-normalized, two decimals each.
impl fmt::Display for FeatureVectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw: Vec<f64> = self.raw.iter().map(|&c| c as f64).collect();
        write_row(f, "Absolute", &raw)?;
        writeln!(f)?;
        write_row(f, "Sum-normalized", &self.sum_normalized)?;
        writeln!(f)?;
        write_row(f, "Max-normalized", &self.max_normalized)
    }
}

/// Count dark cells per band and normalize the counts.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(grid, bands), fields(bands = bands.count()))
)]
pub fn extract_features(grid: &BinaryGrid, bands: &Bands) -> Result<FeatureVectors, FeatureError> {
    if bands.image_width() != grid.width() {
        return Err(FeatureError::BandsMismatch {
            bands_width: bands.image_width(),
            grid_width: grid.width(),
        });
    }

    let covered = bands.covered_width();
    let band_width = bands.band_width();
    if band_width == 0 || covered > grid.width() {
        return Err(FeatureError::BandsMismatch {
            bands_width: covered,
            grid_width: grid.width(),
        });
    }

    let mut raw = vec![0u64; bands.count()];
    for y in 0..grid.height() {
        let row = &grid.row(y)[..covered];
        for (count, chunk) in raw.iter_mut().zip(row.chunks_exact(band_width)) {
            *count += chunk.iter().filter(|&&d| d).count() as u64;
        }
    }

    let features = FeatureVectors::from_raw(raw);
    if features.degenerate {
        log::warn!(
            "no dark pixels inside {} bands; normalized vectors set to zero",
            bands.count()
        );
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_all_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn from_raw_normalizes_both_ways() {
        let f = FeatureVectors::from_raw(vec![2, 6, 0, 2]);
        assert!(!f.degenerate);
        assert_all_close(&f.sum_normalized, &[0.2, 0.6, 0.0, 0.2]);
        let third = 1.0 / 3.0;
        assert_all_close(&f.max_normalized, &[third, 1.0, 0.0, third]);
    }

    #[test]
    fn all_zero_counts_are_degenerate() {
        let f = FeatureVectors::from_raw(vec![0, 0, 0]);
        assert!(f.degenerate);
        assert_eq!(f.sum_normalized, vec![0.0; 3]);
        assert_eq!(f.max_normalized, vec![0.0; 3]);
    }

    #[test]
    fn display_uses_two_decimals() {
        let f = FeatureVectors::from_raw(vec![1, 2]);
        assert_eq!(
            f.to_string(),
            "Absolute: [1.00, 2.00]\n\
             Sum-normalized: [0.33, 0.67]\n\
             Max-normalized: [0.50, 1.00]"
        );
    }

    #[test]
    fn rejects_bands_for_other_width() {
        let img = bandvec_core::GrayImage::filled(4, 1, 0).expect("img");
        let grid = crate::binarize(&img.view(), 10).expect("grid");
        let bands = Bands::new(6, 2).expect("bands");
        assert_eq!(
            extract_features(&grid, &bands),
            Err(FeatureError::BandsMismatch {
                bands_width: 6,
                grid_width: 4
            })
        );
    }

    #[test]
    fn remainder_columns_are_not_counted() {
        // Width 5, two bands of width 2; column 4 is dark but excluded.
        let img = bandvec_core::GrayImage::from_rows(&[[255u8, 255, 255, 255, 0]]).expect("img");
        let grid = crate::binarize(&img.view(), 10).expect("grid");
        let bands = Bands::new(5, 2).expect("bands");
        let f = extract_features(&grid, &bands).expect("features");
        assert_eq!(f.raw, vec![0, 0]);
        assert!(f.degenerate);
    }
}
