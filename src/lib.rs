pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod gate;
pub mod models;

pub use config::RecognitionConfig;
pub use detection::{PlateRecognizer, load_image};
pub use detection::ocr::{OcrsRecognizer, TextRecognizer};
pub use error::RecognitionError;
pub use gate::{GateController, GateDecision, Registration};
pub use models::{BoundingBox, Contour, PlateRegion, PlateString};
