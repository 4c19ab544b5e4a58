use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use crate::core::db::{Gate, GateLogRepository, PlateRegistry, PlateRepository, RegisterOutcome};
use crate::detection::PlateRecognizer;
use crate::detection::ocr::{OcrsRecognizer, TextRecognizer};
use crate::error::RecognitionError;
use crate::models::PlateString;

/// Result of registering the plate shown in an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered(PlateString),
    AlreadyExists(PlateString),
    /// No plate region was found, or OCR read nothing
    NoPlate,
}

/// Decision taken at a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Registered plate; the passage was logged
    Granted(PlateString),
    /// Plate read but not registered
    Denied(PlateString),
    /// No plate region was found, or OCR read nothing
    NoPlate,
}

impl GateDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted(_))
    }
}

/// Ties plate recognition to the registry for the gate workflows.
///
/// Recognition is CPU-bound and runs on tokio's blocking pool.
pub struct GateController<R = OcrsRecognizer> {
    recognizer: Arc<PlateRecognizer<R>>,
    registry: PlateRegistry,
}

impl<R: TextRecognizer + 'static> GateController<R> {
    pub fn new(recognizer: PlateRecognizer<R>, registry: PlateRegistry) -> Self {
        Self {
            recognizer: Arc::new(recognizer),
            registry,
        }
    }

    pub fn registry(&self) -> &PlateRegistry {
        &self.registry
    }

    /// Read the plate in `image_path`. `None` when the image shows no usable
    /// plate; decode and OCR failures are errors.
    pub async fn read_plate<P: AsRef<Path>>(
        &self,
        image_path: P,
    ) -> anyhow::Result<Option<PlateString>> {
        let image_path = image_path.as_ref().to_path_buf();
        let recognizer = Arc::clone(&self.recognizer);
        let path = image_path.clone();
        let result = tokio::task::spawn_blocking(move || recognizer.recognize(&path))
            .await
            .context("Plate recognition task failed")?;

        match result {
            Ok(plate) if plate.is_empty() => {
                warn!("No text read from plate in {:?}", image_path);
                Ok(None)
            }
            Ok(plate) => Ok(Some(plate)),
            Err(RecognitionError::PlateNotFound) => {
                warn!("No license plate detected in {:?}", image_path);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Register the plate shown in the image.
    pub async fn register_from_image<P: AsRef<Path>>(
        &self,
        image_path: P,
    ) -> anyhow::Result<Registration> {
        let Some(plate) = self.read_plate(image_path).await? else {
            return Ok(Registration::NoPlate);
        };

        match self.registry.register_plate(plate.as_str()).await? {
            RegisterOutcome::Registered => Ok(Registration::Registered(plate)),
            RegisterOutcome::AlreadyExists => Ok(Registration::AlreadyExists(plate)),
        }
    }

    /// Check the plate shown in the image at the given gate. Granted
    /// passages are appended to that gate's log.
    pub async fn verify<P: AsRef<Path>>(
        &self,
        image_path: P,
        gate: Gate,
    ) -> anyhow::Result<GateDecision> {
        let Some(plate) = self.read_plate(image_path).await? else {
            return Ok(GateDecision::NoPlate);
        };

        if !self.registry.is_authorized(plate.as_str()).await? {
            info!("{} denied for {:?}", gate, plate.as_str());
            return Ok(GateDecision::Denied(plate));
        }

        self.registry.log_event(gate, plate.as_str()).await?;
        info!("{} granted for {:?}", gate, plate.as_str());
        Ok(GateDecision::Granted(plate))
    }

    /// Release the registry.
    pub async fn close(self) -> anyhow::Result<()> {
        self.registry.close().await
    }
}
