use std::path::Path;

use ::image::imageops::{self, FilterType};
use ::image::{ImageReader, RgbImage};

use crate::core::{self, ImageError};
use crate::features::{self, AnnotatedImage, ExtractParams, Extraction, FeatureError};

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Buffer(#[from] ImageError),

    #[error("failed to read or write image: {0}")]
    Codec(#[from] ::image::ImageError),

    #[error("image dimension {value} does not fit in u32")]
    DimensionOverflow { value: usize },

    #[error("preview size must be positive")]
    InvalidPreviewSize,
}

/// Convert an `image::GrayImage` into the lightweight `bandvec-core` view type.
pub fn gray_view(img: &::image::GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::GrayImage, ExtractError> {
    core::GrayImageView::new(width as usize, height as usize, pixels)?;
    ::image::GrayImage::from_raw(width, height, pixels.to_vec()).ok_or(ExtractError::Buffer(
        ImageError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        },
    ))
}

/// Decode an image file and convert it to 8-bit luma.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(path)))]
pub fn load_gray(path: impl AsRef<Path>) -> Result<::image::GrayImage, ExtractError> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .map_err(::image::ImageError::IoError)?
        .decode()?;
    log::debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_luma8())
}

/// Run the extractor on an `image::GrayImage`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "info",
        skip(img, params),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn extract_image(
    img: &::image::GrayImage,
    params: &ExtractParams,
) -> Result<Extraction, ExtractError> {
    let extractor = features::FeatureExtractor::new(params.clone());
    Ok(extractor.extract(&gray_view(img))?)
}

/// Decode `path` and run the extractor on it.
pub fn extract_path(
    path: impl AsRef<Path>,
    params: &ExtractParams,
) -> Result<Extraction, ExtractError> {
    // Cheap parameter errors should not wait for decoding.
    params.validate()?;
    let img = load_gray(path)?;
    extract_image(&img, params)
}

pub fn extract_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: &ExtractParams,
) -> Result<Extraction, ExtractError> {
    let view = core::GrayImageView::new(width as usize, height as usize, pixels)?;
    Ok(features::FeatureExtractor::new(params.clone()).extract(&view)?)
}

fn to_u32(value: usize) -> Result<u32, ExtractError> {
    u32::try_from(value).map_err(|_| ExtractError::DimensionOverflow { value })
}

/// Convert the annotation into an `image::RgbImage`.
pub fn annotated_to_rgb(annotated: &AnnotatedImage) -> Result<RgbImage, ExtractError> {
    let width = to_u32(annotated.width)?;
    let height = to_u32(annotated.height)?;
    RgbImage::from_raw(width, height, annotated.data.clone()).ok_or(ExtractError::Buffer(
        ImageError::InvalidGrayBuffer {
            expected: annotated.width * annotated.height * 3,
            got: annotated.data.len(),
        },
    ))
}

/// Resize to a `size x size` square for display.
pub fn preview(img: &RgbImage, size: u32) -> Result<RgbImage, ExtractError> {
    if size == 0 {
        return Err(ExtractError::InvalidPreviewSize);
    }
    Ok(imageops::resize(img, size, size, FilterType::Triangle))
}

/// Write the annotation to `path`, optionally resized to a square preview.
/// The format follows the file extension.
pub fn save_annotated(
    annotated: &AnnotatedImage,
    path: impl AsRef<Path>,
    preview_size: Option<u32>,
) -> Result<(), ExtractError> {
    let path = path.as_ref();
    let mut rgb = annotated_to_rgb(annotated)?;
    if let Some(size) = preview_size {
        rgb = preview(&rgb, size)?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(::image::ImageError::IoError)?;
    }
    rgb.save(path)?;
    log::info!(
        "wrote annotated image {}x{} to {}",
        rgb.width(),
        rgb.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_image_from_slice_checks_length() {
        let err = gray_image_from_slice(3, 3, &[0u8; 8]).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Buffer(ImageError::InvalidGrayBuffer {
                expected: 9,
                got: 8
            })
        ));
        let img = gray_image_from_slice(3, 3, &[7u8; 9]).expect("img");
        assert_eq!(img.get_pixel(2, 2).0, [7]);
    }

    #[test]
    fn extract_from_gray_u8_matches_view_extraction() {
        let pixels = [0u8, 0, 200, 200, 0, 0, 200, 200];
        let out = extract_from_gray_u8(4, 2, &pixels, &ExtractParams::new(128, 2)).expect("out");
        assert_eq!(out.features.raw, vec![4, 0]);
    }

    #[test]
    fn annotated_to_rgb_preserves_pixels() {
        let img = gray_image_from_slice(4, 1, &[0, 0, 255, 255]).expect("img");
        let params = ExtractParams {
            marker: features::MarkerStyle {
                color: [0, 0, 255],
                thickness: 1,
            },
            ..ExtractParams::new(128, 2)
        };
        let out = extract_image(&img, &params).expect("extract");
        let rgb = annotated_to_rgb(&out.annotated).expect("rgb");
        assert_eq!(rgb.dimensions(), (4, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(2, 0).0, [0, 0, 255]);
        assert_eq!(rgb.get_pixel(3, 0).0, [255, 255, 255]);
    }

    #[test]
    fn preview_is_square() {
        let rgb = RgbImage::new(40, 10);
        let small = preview(&rgb, 16).expect("preview");
        assert_eq!(small.dimensions(), (16, 16));
        assert!(matches!(
            preview(&rgb, 0),
            Err(ExtractError::InvalidPreviewSize)
        ));
    }

    #[test]
    fn extract_path_reports_parameter_errors_before_decoding() {
        let err = extract_path("does/not/exist.png", &ExtractParams::new(999, 2)).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Feature(FeatureError::ThresholdOutOfRange { threshold: 999 })
        ));
        let err = extract_path("does/not/exist.png", &ExtractParams::new(10, 2)).unwrap_err();
        assert!(matches!(err, ExtractError::Codec(_)));
    }

    #[test]
    fn save_and_reload_annotation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("src.png");
        let img = gray_image_from_slice(6, 2, &[0, 0, 0, 255, 255, 255, 0, 0, 0, 255, 255, 255])
            .expect("img");
        img.save(&src).expect("save src");

        let out = extract_path(&src, &ExtractParams::new(128, 3)).expect("extract");
        assert_eq!(out.features.raw, vec![4, 2, 0]);

        let dst = dir.path().join("out").join("annotated.png");
        save_annotated(&out.annotated, &dst, Some(12)).expect("save");
        let reloaded = ::image::open(&dst).expect("reload").to_rgb8();
        assert_eq!(reloaded.dimensions(), (12, 12));
    }
}
