use std::sync::Mutex;
use std::thread::{self, ThreadId};

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use plategate::core::db::PlateRegistry;
use plategate::TextRecognizer;
use tempfile::NamedTempFile;

/// Outer bounds of the synthetic plate: (x, y, width, height)
pub const PLATE_RECT: (i32, i32, u32, u32) = (60, 50, 200, 80);

const BORDER: u32 = 4;

/// Recognizer stand-in that returns a fixed string and remembers what it saw.
pub struct ScriptedRecognizer {
    text: String,
    seen: Mutex<Vec<GrayImage>>,
    threads: Mutex<Vec<ThreadId>>,
}

impl ScriptedRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seen: Mutex::new(Vec::new()),
            threads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_region(&self) -> Option<GrayImage> {
        self.seen.lock().unwrap().last().cloned()
    }

    /// Threads the OCR calls ran on, in call order
    pub fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().unwrap().clone()
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn image_to_text(&self, region: &GrayImage) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(region.clone());
        self.threads.lock().unwrap().push(thread::current().id());
        Ok(self.text.clone())
    }
}

/// Recognizer stand-in whose engine always fails.
pub struct FailingRecognizer;

impl TextRecognizer for FailingRecognizer {
    fn image_to_text(&self, _region: &GrayImage) -> anyhow::Result<String> {
        anyhow::bail!("recognition model crashed")
    }
}

/// 320x200 white scene with a black-framed plate holding six dark glyph bars.
pub fn plate_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(320, 200, Rgb([255, 255, 255]));
    let (x, y, w, h) = PLATE_RECT;
    let black = Rgb([0, 0, 0]);

    draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), black);
    draw_filled_rect_mut(
        &mut img,
        Rect::at(x + BORDER as i32, y + BORDER as i32).of_size(w - 2 * BORDER, h - 2 * BORDER),
        Rgb([235, 235, 235]),
    );
    for i in 0..6 {
        draw_filled_rect_mut(&mut img, Rect::at(x + 20 + i * 28, y + 20).of_size(16, 40), black);
    }
    img
}

/// The plate scene plus small specks and a small framed box around it.
pub fn noisy_plate_scene() -> RgbImage {
    let mut img = plate_scene();
    let black = Rgb([0, 0, 0]);
    for i in 0..18 {
        draw_filled_rect_mut(&mut img, Rect::at(10 + i * 17, 12).of_size(6, 6), black);
        draw_filled_rect_mut(&mut img, Rect::at(10 + i * 17, 178).of_size(5, 7), black);
    }
    draw_filled_rect_mut(&mut img, Rect::at(12, 145).of_size(34, 18), black);
    draw_filled_rect_mut(&mut img, Rect::at(15, 148).of_size(28, 12), Rgb([255, 255, 255]));
    img
}

pub fn blank_scene() -> GrayImage {
    GrayImage::from_pixel(160, 120, Luma([255]))
}

/// Save an image as a temporary PNG. The file is removed when dropped.
pub fn save_png(img: impl Into<DynamicImage>) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    let img: DynamicImage = img.into();
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Creates a registry in a temporary directory.
/// Returns both the registry and the temp directory (which must be kept alive).
pub async fn create_test_registry() -> (PlateRegistry, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let registry = PlateRegistry::open(dir.path().join("registry.db"))
        .await
        .expect("Failed to create test registry");
    (registry, dir)
}

pub fn assert_near(actual: u32, expected: u32, tolerance: u32, what: &str) {
    assert!(
        actual.abs_diff(expected) <= tolerance,
        "{what}: expected {expected} ± {tolerance}, got {actual}"
    );
}
