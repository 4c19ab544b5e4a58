use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use image::{DynamicImage, GrayImage};
use log::{debug, info};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;

use crate::error::RecognitionError;
use crate::models::PlateString;

/// Black-box image-to-text conversion.
///
/// Implementations are expected to be deterministic for identical pixels and
/// to cope with two-level input.
pub trait TextRecognizer: Send + Sync {
    fn image_to_text(&self, region: &GrayImage) -> anyhow::Result<String>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn image_to_text(&self, region: &GrayImage) -> anyhow::Result<String> {
        (**self).image_to_text(region)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Arc<T> {
    fn image_to_text(&self, region: &GrayImage) -> anyhow::Result<String> {
        (**self).image_to_text(region)
    }
}

/// Default model directory, `~/.cache/ocrs`
pub fn default_model_dir() -> anyhow::Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Cannot locate home directory for OCR models")?;
    Ok(Path::new(&home_dir).join(".cache/ocrs"))
}

/// Initialize OCR engine with models from `model_dir`
pub fn init_ocr_engine(model_dir: &Path) -> anyhow::Result<OcrEngine> {
    let detection_model_path = model_dir.join("text-detection.rten");
    let recognition_model_path = model_dir.join("text-recognition.rten");

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        anyhow::bail!(
            "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
             Expected locations:\n  - {}\n  - {}",
            detection_model_path.display(),
            recognition_model_path.display()
        );
    }

    let detection_model = Model::load_file(&detection_model_path)?;
    let recognition_model = Model::load_file(&recognition_model_path)?;

    let engine = OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })?;

    Ok(engine)
}

/// `ocrs` adapter. The engine is loaded on first use and shared afterwards.
pub struct OcrsRecognizer {
    model_dir: Option<PathBuf>,
    engine: Mutex<Option<Arc<OcrEngine>>>,
}

impl OcrsRecognizer {
    /// `None` uses [`default_model_dir`].
    pub fn new(model_dir: Option<PathBuf>) -> Self {
        Self {
            model_dir,
            engine: Mutex::new(None),
        }
    }

    fn engine(&self) -> anyhow::Result<Arc<OcrEngine>> {
        let mut guard = self
            .engine
            .lock()
            .map_err(|_| anyhow::anyhow!("OCR engine lock poisoned"))?;
        if let Some(engine) = guard.as_ref() {
            return Ok(engine.clone());
        }

        let model_dir = match &self.model_dir {
            Some(dir) => dir.clone(),
            None => default_model_dir()?,
        };
        info!("Initializing OCR engine from {}", model_dir.display());
        let engine = Arc::new(init_ocr_engine(&model_dir)?);
        *guard = Some(engine.clone());
        Ok(engine)
    }
}

impl Default for OcrsRecognizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn image_to_text(&self, region: &GrayImage) -> anyhow::Result<String> {
        let engine = self.engine()?;

        let img = DynamicImage::ImageLuma8(region.clone()).to_rgb8();
        let img_source = ImageSource::from_bytes(img.as_raw(), img.dimensions())
            .ok()
            .context("Plate region has invalid dimensions for OCR")?;
        let ocr_input = engine.prepare_input(img_source)?;
        engine.get_text(&ocr_input)
    }
}

/// Runs the recognizer and canonicalizes its output into a [`PlateString`].
pub struct TextExtractor<R> {
    recognizer: R,
}

impl<R: TextRecognizer> TextExtractor<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// An empty result is not an error.
    pub fn extract(&self, region: &GrayImage) -> Result<PlateString, RecognitionError> {
        let raw = self
            .recognizer
            .image_to_text(region)
            .map_err(RecognitionError::Ocr)?;
        let plate = PlateString::from_ocr_text(&raw);
        debug!("OCR read {:?}, canonical {:?}", raw, plate.as_str());
        Ok(plate)
    }
}
