use std::fmt;

use time::OffsetDateTime;

/// Which gate an event happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Entry,
    Exit,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Entry => f.write_str("entry"),
            Gate::Exit => f.write_str("exit"),
        }
    }
}

/// One append-only row of the entry or exit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateEvent {
    pub id: i64,
    pub gate: Gate,
    pub plate_number: String,
    pub time: OffsetDateTime,
    pub(super) _guard: (),
}

pub trait GateLogRepository {
    fn log_event(&self, gate: Gate, plate: &str) -> impl Future<Output = anyhow::Result<GateEvent>>;
    fn get_events(&self, gate: Gate) -> impl Future<Output = anyhow::Result<Vec<GateEvent>>>;

    fn log_entry(&self, plate: &str) -> impl Future<Output = anyhow::Result<GateEvent>> {
        self.log_event(Gate::Entry, plate)
    }

    fn log_exit(&self, plate: &str) -> impl Future<Output = anyhow::Result<GateEvent>> {
        self.log_event(Gate::Exit, plate)
    }

    fn get_entry_logs(&self) -> impl Future<Output = anyhow::Result<Vec<GateEvent>>> {
        self.get_events(Gate::Entry)
    }

    fn get_exit_logs(&self) -> impl Future<Output = anyhow::Result<Vec<GateEvent>>> {
        self.get_events(Gate::Exit)
    }
}
