use image::{DynamicImage, GrayImage};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::edges::canny;
use imageproc::filter;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Two-level threshold: pixels strictly above `cut` become `level`, the rest 0.
pub fn threshold_binary(img: &GrayImage, cut: u8, level: u8) -> GrayImage {
    let mut out = threshold(img, cut, ThresholdType::Binary);
    if level != u8::MAX {
        for p in out.pixels_mut() {
            if p[0] == u8::MAX {
                p[0] = level;
            }
        }
    }
    out
}

/// Edge-preserving bilateral smoothing over a `diameter` x `diameter` window.
/// Pixels past the border are clamped to the nearest edge pixel.
pub fn bilateral_filter(
    img: &GrayImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> GrayImage {
    if img.width() == 0 || img.height() == 0 {
        return img.clone();
    }
    filter::bilateral_filter(img, diameter, sigma_color, sigma_space)
}
