use std::fmt;

use image::GrayImage;
use imageproc::geometry::{arc_length, contour_area};
use imageproc::point::Point;

/// Axis-aligned rectangle in source image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Clamp the box to an image of the given size. Returns `None` if nothing
    /// of the box remains inside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<BoundingBox> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let clamped = BoundingBox {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        };
        if clamped.width == 0 || clamped.height == 0 {
            None
        } else {
            Some(clamped)
        }
    }
}

/// Closed boundary traced in an edge map.
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Enclosed area (shoelace formula, unsigned)
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    /// Length of the closed boundary
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }

    /// Smallest upright rectangle containing every contour point
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let x = u32::try_from(min_x).ok()?;
        let y = u32::try_from(min_y).ok()?;
        Some(BoundingBox {
            x,
            y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }
}

/// The sub-image selected as containing the license plate.
#[derive(Debug, Clone)]
pub struct PlateRegion {
    /// Bounding box of the selected contour in the source image
    pub bbox: BoundingBox,
    /// Vertices of the quadrilateral approximation
    pub corners: Vec<Point<i32>>,
    /// Grayscale crop of `bbox`
    pub image: GrayImage,
}

/// Canonical plate identifier produced by the text extractor.
///
/// Never contains whitespace. May be empty when OCR finds no text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlateString(String);

impl PlateString {
    /// Canonicalize raw OCR output: drop every whitespace character, then trim.
    pub fn from_ocr_text(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        Self(compact.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlateString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
