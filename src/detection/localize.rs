use image::{DynamicImage, GrayImage};
use log::debug;

use crate::config::LocalizerConfig;
use crate::detection::{contours, polygon, preprocessing};
use crate::models::{Contour, PlateRegion};

/// Number of vertices a candidate must simplify to
const PLATE_VERTICES: usize = 4;

/// Finds the most plate-like quadrilateral in an image.
#[derive(Debug, Clone, Default)]
pub struct PlateLocalizer {
    pub config: LocalizerConfig,
}

impl PlateLocalizer {
    pub fn new(config: LocalizerConfig) -> Self {
        Self { config }
    }

    /// Locate the plate region. `None` when no ranked contour simplifies to a
    /// quadrilateral.
    pub fn localize(&self, img: &DynamicImage) -> Option<PlateRegion> {
        let gray = preprocessing::to_grayscale(img);
        let edges =
            preprocessing::detect_edges(&gray, self.config.canny_low, self.config.canny_high);
        self.select_region(&gray, &edges)
    }

    /// Select the plate region from an edge map of `gray`.
    ///
    /// The first candidate by descending area whose polygon approximation has
    /// four vertices wins.
    pub fn select_region(&self, gray: &GrayImage, edges: &GrayImage) -> Option<PlateRegion> {
        let all_contours = contours::find_contours(edges);
        debug!("Found {} contours", all_contours.len());

        let candidates = contours::rank_by_area(all_contours, self.config.max_candidates);
        if candidates.is_empty() {
            return None;
        }

        for (rank, candidate) in candidates.iter().enumerate() {
            let Some(corners) = self.quadrilateral(candidate) else {
                continue;
            };
            let Some(bbox) = candidate
                .bounding_box()
                .and_then(|bbox| bbox.clamp_to(gray.width(), gray.height()))
            else {
                continue;
            };

            debug!(
                "Candidate {} (area {:.0}) is a quadrilateral at {}x{}+{}+{}",
                rank + 1,
                candidate.area(),
                bbox.width,
                bbox.height,
                bbox.x,
                bbox.y
            );
            let image =
                image::imageops::crop_imm(gray, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
            return Some(PlateRegion { bbox, corners, image });
        }

        debug!("None of {} candidates is a quadrilateral", candidates.len());
        None
    }

    /// Polygon approximation of the contour if it has exactly four vertices.
    fn quadrilateral(&self, contour: &Contour) -> Option<Vec<imageproc::point::Point<i32>>> {
        if contour.points.len() < 3 {
            return None;
        }
        let perimeter = contour.perimeter();
        if perimeter <= 0.0 {
            return None;
        }
        let epsilon = self.config.approx_epsilon_ratio * perimeter;
        let approx = polygon::approximate_closed(&contour.points, epsilon);
        (approx.len() == PLATE_VERTICES).then_some(approx)
    }
}
