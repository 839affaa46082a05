//! JSON configuration and report helpers.

use crate::{ExtractParams, Extraction, FeatureError, FeatureExtractor};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub image_path: String,
    /// Where to write the JSON report.
    #[serde(default)]
    pub output_path: Option<String>,
    /// Where to write the annotated image.
    #[serde(default)]
    pub annotated_path: Option<String>,
    /// Resize the annotated image to `preview_size x preview_size` before writing.
    #[serde(default)]
    pub preview_size: Option<u32>,
    #[serde(flatten)]
    pub params: ExtractParams,
}

impl ExtractConfig {
    pub fn new(image_path: impl Into<String>, params: ExtractParams) -> Self {
        Self {
            image_path: image_path.into(),
            output_path: None,
            annotated_path: None,
            preview_size: None,
            params,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("bandvec_report.json"))
    }

    /// Build an extractor after checking the parameters.
    pub fn build_extractor(&self) -> Result<FeatureExtractor, FeatureError> {
        self.params.validate()?;
        Ok(FeatureExtractor::new(self.params.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractReport {
    pub image_path: String,
    pub threshold: i32,
    pub segments: usize,
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
    #[serde(default)]
    pub band_width: Option<usize>,
    #[serde(default)]
    pub excluded_columns: Option<usize>,
    #[serde(default)]
    pub raw: Vec<u64>,
    #[serde(default)]
    pub sum_normalized: Vec<f64>,
    #[serde(default)]
    pub max_normalized: Vec<f64>,
    #[serde(default)]
    pub degenerate: bool,
    #[serde(default)]
    pub annotated_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExtractReport {
    /// Base report for a run, with no results yet.
    pub fn new(image_path: impl Into<String>, params: &ExtractParams) -> Self {
        Self {
            image_path: image_path.into(),
            threshold: params.threshold,
            segments: params.segments,
            width: None,
            height: None,
            band_width: None,
            excluded_columns: None,
            raw: Vec::new(),
            sum_normalized: Vec::new(),
            max_normalized: Vec::new(),
            degenerate: false,
            annotated_path: None,
            error: None,
        }
    }

    /// Populate report fields from a successful extraction.
    pub fn set_extraction(&mut self, res: &Extraction) {
        self.width = Some(res.binary.width());
        self.height = Some(res.binary.height());
        self.band_width = Some(res.bands.band_width());
        self.excluded_columns = Some(res.bands.excluded_columns());
        self.raw = res.features.raw.clone();
        self.sum_normalized = res.features.sum_normalized.clone();
        self.max_normalized = res.features.max_normalized.clone();
        self.degenerate = res.features.degenerate;
        self.error = None;
    }

    /// Record a failure, dropping any results set earlier in the run.
    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.width = None;
        self.height = None;
        self.band_width = None;
        self.excluded_columns = None;
        self.raw.clear();
        self.sum_normalized.clear();
        self.max_normalized.clear();
        self.degenerate = false;
        self.annotated_path = None;
        self.error = Some(err.to_string());
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use bandvec_core::GrayImage;

    #[test]
    fn config_params_are_flattened() {
        let cfg: ExtractConfig = serde_json::from_str(
            r#"{"image_path": "a.png", "threshold": 90, "segments": 5, "annotated_path": "out.png"}"#,
        )
        .expect("json");
        assert_eq!(cfg.params.threshold, 90);
        assert_eq!(cfg.params.segments, 5);
        assert_eq!(cfg.annotated_path.as_deref(), Some("out.png"));
        assert_eq!(cfg.output_path(), PathBuf::from("bandvec_report.json"));
    }

    #[test]
    fn build_extractor_validates() {
        let cfg = ExtractConfig::new("a.png", ExtractParams::new(400, 3));
        assert!(matches!(
            cfg.build_extractor(),
            Err(FeatureError::ThresholdOutOfRange { threshold: 400 })
        ));
    }

    #[test]
    fn report_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("report.json");

        let img = GrayImage::from_rows(&[[0u8, 0, 200, 200, 10]]).expect("img");
        let res = extract(&img.view(), 128, 2).expect("extract");
        let mut report = ExtractReport::new("mem", &ExtractParams::new(128, 2));
        report.set_extraction(&res);
        report.write_json(&path).expect("write");

        let loaded = ExtractReport::load_json(&path).expect("load");
        assert_eq!(loaded, report);
        assert_eq!(loaded.raw, vec![2, 0]);
        assert_eq!(loaded.excluded_columns, Some(1));
        assert!(loaded.is_ok());
    }

    #[test]
    fn set_error_keeps_parameters() {
        let mut report = ExtractReport::new("x.png", &ExtractParams::new(10, 12));
        report.set_error(FeatureError::SegmentsExceedWidth {
            segments: 12,
            width: 8,
        });
        assert!(!report.is_ok());
        assert_eq!(report.segments, 12);
        assert_eq!(
            report.error.as_deref(),
            Some("segment count 12 exceeds image width 8")
        );
    }

    #[test]
    fn set_error_discards_earlier_results() {
        let img = GrayImage::from_rows(&[[0u8, 0, 200, 200]]).expect("img");
        let res = extract(&img.view(), 128, 2).expect("extract");
        let mut report = ExtractReport::new("mem", &ExtractParams::new(128, 2));
        report.set_extraction(&res);
        report.annotated_path = Some("out.png".into());

        report.set_error("write failed");
        assert!(report.raw.is_empty());
        assert!(report.sum_normalized.is_empty());
        assert!(report.max_normalized.is_empty());
        assert_eq!(report.width, None);
        assert_eq!(report.annotated_path, None);
        assert_eq!(report.error.as_deref(), Some("write failed"));
    }
}
