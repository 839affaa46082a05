use bandvec_core::ImageError;

/// Errors returned by the feature extractor.
///
/// Every variant describes malformed or out-of-range input; see
/// [`FeatureError::is_invalid_input`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("image is empty (width={width}, height={height})")]
    EmptyImage { width: usize, height: usize },

    #[error("threshold {threshold} is outside [0, 255]")]
    ThresholdOutOfRange { threshold: i32 },

    #[error("segment count {segments} is below the minimum of 2")]
    TooFewSegments { segments: usize },

    #[error("segment count {segments} exceeds image width {width}")]
    SegmentsExceedWidth { segments: usize, width: usize },

    #[error("bands cover width {bands_width}, grid has width {grid_width}")]
    BandsMismatch {
        bands_width: usize,
        grid_width: usize,
    },

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl FeatureError {
    /// All extractor failures are caller errors; nothing is transient.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            FeatureError::EmptyImage { .. }
                | FeatureError::ThresholdOutOfRange { .. }
                | FeatureError::TooFewSegments { .. }
                | FeatureError::SegmentsExceedWidth { .. }
                | FeatureError::BandsMismatch { .. }
                | FeatureError::Image(_)
        )
    }
}
