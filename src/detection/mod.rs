pub mod preprocessing;
pub mod contours;
pub mod polygon;
pub mod localize;
pub mod normalize;
pub mod ocr;

use std::path::Path;

use image::DynamicImage;
use log::{debug, info};

use crate::config::RecognitionConfig;
use crate::error::RecognitionError;
use crate::models::{PlateRegion, PlateString};
use localize::PlateLocalizer;
use normalize::PlateNormalizer;
use ocr::{OcrsRecognizer, TextExtractor, TextRecognizer};

/// Read an image file into memory
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, RecognitionError> {
    let path = path.as_ref();
    image::open(path).map_err(|source| RecognitionError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Main recognition pipeline orchestrator
///
/// Load, localize, normalize, extract. Each stage runs once and every failure
/// ends the call.
pub struct PlateRecognizer<R = OcrsRecognizer> {
    localizer: PlateLocalizer,
    normalizer: PlateNormalizer,
    extractor: TextExtractor<R>,
}

impl PlateRecognizer<OcrsRecognizer> {
    /// Recognizer backed by the `ocrs` engine, models taken from the config.
    pub fn with_ocrs(config: RecognitionConfig) -> Self {
        let recognizer = OcrsRecognizer::new(config.ocr.model_dir.clone());
        Self::new(config, recognizer)
    }
}

impl<R: TextRecognizer> PlateRecognizer<R> {
    pub fn new(config: RecognitionConfig, recognizer: R) -> Self {
        Self {
            localizer: PlateLocalizer::new(config.localizer),
            normalizer: PlateNormalizer::new(config.normalizer),
            extractor: TextExtractor::new(recognizer),
        }
    }

    pub fn recognizer(&self) -> &R {
        self.extractor.recognizer()
    }

    /// Read the plate in the image at `path`
    pub fn recognize<P: AsRef<Path>>(&self, path: P) -> Result<PlateString, RecognitionError> {
        let path = path.as_ref();
        debug!("Loading image: {:?}", path);
        let img = load_image(path)?;
        self.recognize_image(&img)
    }

    /// Run localize, normalize and extract on an already loaded image
    pub fn recognize_image(&self, img: &DynamicImage) -> Result<PlateString, RecognitionError> {
        debug!("Image loaded: {}x{}", img.width(), img.height());

        let region = self
            .localizer
            .localize(img)
            .ok_or(RecognitionError::PlateNotFound)?;

        let cleaned = self.normalizer.normalize(&region.image);
        let plate = self.extractor.extract(&cleaned)?;

        info!(
            "Recognized plate {:?} at {}x{}+{}+{}",
            plate.as_str(),
            region.bbox.width,
            region.bbox.height,
            region.bbox.x,
            region.bbox.y
        );
        Ok(plate)
    }

    /// Load and localize only, without OCR
    pub fn locate<P: AsRef<Path>>(&self, path: P) -> Result<PlateRegion, RecognitionError> {
        let img = load_image(path)?;
        self.localizer
            .localize(&img)
            .ok_or(RecognitionError::PlateNotFound)
    }
}
