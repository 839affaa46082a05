use bandvec_core::GrayImageView;
use serde::{Deserialize, Serialize};

use crate::{
    annotate, binarize, extract_features, segment, AnnotatedImage, Bands, BinaryGrid,
    ExtractParams, FeatureError, FeatureVectors,
};

/// Everything one extraction produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub binary: BinaryGrid,
    pub bands: Bands,
    pub features: FeatureVectors,
    pub annotated: AnnotatedImage,
}

/// Stateless band-density feature extractor.
#[derive(Clone, Debug, Default)]
pub struct FeatureExtractor {
    params: ExtractParams,
}

impl FeatureExtractor {
    pub fn new(params: ExtractParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractParams {
        &self.params
    }

    /// Binarize, split into bands, count and annotate.
    ///
    /// Either every output is produced or an error is returned.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "info",
            skip(self, image),
            fields(
                width = image.width,
                height = image.height,
                threshold = self.params.threshold,
                segments = self.params.segments
            )
        )
    )]
    pub fn extract(&self, image: &GrayImageView<'_>) -> Result<Extraction, FeatureError> {
        self.params.validate()?;

        let binary = binarize(image, self.params.threshold)?;
        let bands = segment(&binary, self.params.segments)?;
        let features = extract_features(&binary, &bands)?;
        let annotated = annotate(&binary, self.params.segments, &self.params.marker)?;

        log::debug!(
            "extracted {} bands of width {} from {}x{} image, {} dark pixels counted",
            bands.count(),
            bands.band_width(),
            image.width,
            image.height,
            features.total_dark()
        );

        Ok(Extraction {
            binary,
            bands,
            features,
            annotated,
        })
    }
}

/// One-shot extraction with the default marker style.
pub fn extract(
    image: &GrayImageView<'_>,
    threshold: i32,
    segments: usize,
) -> Result<Extraction, FeatureError> {
    FeatureExtractor::new(ExtractParams::new(threshold, segments)).extract(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandvec_core::GrayImage;

    #[test]
    fn outputs_share_dimensions() {
        let img = GrayImage::filled(10, 3, 50).expect("img");
        let out = extract(&img.view(), 100, 3).expect("extract");
        assert_eq!(out.binary.width(), 10);
        assert_eq!(out.annotated.width, 10);
        assert_eq!(out.annotated.height, 3);
        assert_eq!(out.bands.band_width(), 3);
        assert_eq!(out.features.raw, vec![9, 9, 9]);
    }

    #[test]
    fn invalid_threshold_fails_before_any_work() {
        let img = GrayImage::filled(0, 0, 0).expect("img");
        // Parameter validation comes first, so the threshold error wins.
        assert_eq!(
            extract(&img.view(), 300, 2).unwrap_err(),
            FeatureError::ThresholdOutOfRange { threshold: 300 }
        );
    }

    #[test]
    fn extractor_is_reusable() {
        let extractor = FeatureExtractor::new(ExtractParams::new(128, 2));
        let dark = GrayImage::filled(4, 4, 0).expect("img");
        let light = GrayImage::filled(4, 4, 255).expect("img");
        let a = extractor.extract(&dark.view()).expect("dark");
        let b = extractor.extract(&light.view()).expect("light");
        let c = extractor.extract(&dark.view()).expect("dark again");
        assert_eq!(a, c);
        assert!(b.features.degenerate);
    }

    #[test]
    fn extractor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FeatureExtractor>();
    }
}
