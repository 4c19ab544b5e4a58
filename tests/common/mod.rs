mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from plategate for tests
pub use plategate::core::db::{
    DeleteOutcome, Gate, GateEvent, GateLogRepository, PlateRegistry, PlateRepository,
    RegisterOutcome, RegisteredPlate, RenameOutcome,
};
pub use plategate::{
    GateController, GateDecision, PlateRecognizer, RecognitionConfig, RecognitionError,
    Registration,
};
