use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Tuning parameters of the recognition pipeline.
///
/// The defaults were calibrated for a fixed gate camera. Every field can be
/// overridden from a JSON file, missing fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub localizer: LocalizerConfig,
    pub normalizer: NormalizerConfig,
    pub ocr: OcrConfig,
}

impl RecognitionConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid recognition config in {:?}", path))?;
        Ok(config)
    }
}

/// Edge and contour parameters for plate localization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// Lower Canny hysteresis threshold
    pub canny_low: f32,
    /// Upper Canny hysteresis threshold
    pub canny_high: f32,
    /// How many of the largest contours are inspected
    pub max_candidates: usize,
    /// Polygon approximation tolerance as a fraction of the contour perimeter
    pub approx_epsilon_ratio: f64,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            canny_low: 170.0,
            canny_high: 200.0,
            max_candidates: 30,
            approx_epsilon_ratio: 0.01,
        }
    }
}

/// Binarization and smoothing parameters applied to the plate region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub binarize_cut: u8,
    pub bilateral_diameter: u32,
    pub bilateral_sigma_color: f32,
    pub bilateral_sigma_space: f32,
    pub rethreshold_cut: u8,
    /// Foreground level written by the second threshold. Not saturated to 255
    /// by default; some OCR engines misread clipped glyph edges.
    pub output_level: u8,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            binarize_cut: 127,
            bilateral_diameter: 11,
            bilateral_sigma_color: 17.0,
            bilateral_sigma_space: 17.0,
            rethreshold_cut: 150,
            output_level: 180,
        }
    }
}

/// Location of the OCR models.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    /// `None` means `~/.cache/ocrs`.
    pub model_dir: Option<PathBuf>,
}
