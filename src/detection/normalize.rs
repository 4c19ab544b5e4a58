use image::GrayImage;

use crate::config::NormalizerConfig;
use crate::detection::preprocessing;

/// Cleans a grayscale plate crop into a two-level image for OCR.
#[derive(Debug, Clone, Default)]
pub struct PlateNormalizer {
    pub config: NormalizerConfig,
}

impl PlateNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Threshold, smooth, threshold again.
    ///
    /// Smoothing works on continuous intensities and can reintroduce gray
    /// levels, so the result is binarized a second time. Output pixels are
    /// either 0 or `output_level`.
    pub fn normalize(&self, region: &GrayImage) -> GrayImage {
        let c = &self.config;
        let binary = preprocessing::threshold_binary(region, c.binarize_cut, u8::MAX);
        let smoothed = preprocessing::bilateral_filter(
            &binary,
            c.bilateral_diameter,
            c.bilateral_sigma_color,
            c.bilateral_sigma_space,
        );
        preprocessing::threshold_binary(&smoothed, c.rethreshold_cut, c.output_level)
    }
}
