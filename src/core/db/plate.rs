#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPlate {
    pub id: i64,
    pub plate_number: String,
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    NotFound,
    /// The new plate number already belongs to another registration.
    Conflict,
}

pub trait PlateRepository {
    fn register_plate(&self, plate: &str) -> impl Future<Output = anyhow::Result<RegisterOutcome>>;
    fn is_authorized(&self, plate: &str) -> impl Future<Output = anyhow::Result<bool>>;
    fn delete_plate(&self, plate: &str) -> impl Future<Output = anyhow::Result<DeleteOutcome>>;
    fn rename_plate(&self, old: &str, new: &str) -> impl Future<Output = anyhow::Result<RenameOutcome>>;
    fn get_plates(&self) -> impl Future<Output = anyhow::Result<Vec<RegisteredPlate>>>;
    /// Remove every registration and every gate log entry.
    fn clear_all(&self) -> impl Future<Output = anyhow::Result<()>>;
}
