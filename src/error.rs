use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds of a single recognition call.
///
/// None of these are fatal to the process; the caller decides whether to try
/// another image.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The file is missing or is not a decodable image.
    #[error("failed to load image {path:?}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No contour among the ranked candidates approximated to a quadrilateral.
    #[error("no license plate region found in image")]
    PlateNotFound,

    /// The OCR engine itself failed.
    #[error("OCR engine failed: {0:#}")]
    Ocr(anyhow::Error),
}

impl RecognitionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecognitionError::PlateNotFound)
    }
}
