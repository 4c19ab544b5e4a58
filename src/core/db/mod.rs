mod gate_log;
mod model;
mod plate;
mod state;

use std::{path::Path, sync::Arc};

use log::{debug, info};
use sqlx::Connection;
use state::RegistryState;
use time::OffsetDateTime;

pub use gate_log::{Gate, GateEvent, GateLogRepository};
pub use plate::{DeleteOutcome, PlateRepository, RegisterOutcome, RegisteredPlate, RenameOutcome};

/// Handle to the SQLite plate registry and its gate logs.
///
/// Owns a connection pool for its whole lifetime; call [`PlateRegistry::close`]
/// to flush and release it.
#[derive(Debug)]
pub struct PlateRegistry {
    state: Arc<RegistryState>,
}

impl PlateRegistry {
    /// Open (or create) the registry database and apply pending migrations.
    pub async fn open<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(RegistryState::new(db_file).await?),
        })
    }

    pub fn db_file(&self) -> &Path {
        self.state.db_file()
    }

    /// Flush the write-ahead log and release every pooled connection.
    pub async fn close(self) -> anyhow::Result<()> {
        self.state.close().await
    }
}

impl PlateRepository for PlateRegistry {
    async fn register_plate(&self, plate: &str) -> anyhow::Result<RegisterOutcome> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query(
            r#"INSERT INTO license_plates (plate_number) VALUES ($1)
            ON CONFLICT (plate_number) DO NOTHING"#,
        )
        .bind(plate)
        .execute(&mut **conn)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Plate {:?} already registered", plate);
            Ok(RegisterOutcome::AlreadyExists)
        } else {
            info!("Registered plate {:?}", plate);
            Ok(RegisterOutcome::Registered)
        }
    }

    async fn is_authorized(&self, plate: &str) -> anyhow::Result<bool> {
        let mut conn = self.state.conn().await?;
        let found: i64 = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM license_plates WHERE plate_number = $1)"#,
        )
        .bind(plate)
        .fetch_one(&mut **conn)
        .await?;
        Ok(found != 0)
    }

    async fn delete_plate(&self, plate: &str) -> anyhow::Result<DeleteOutcome> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query(r#"DELETE FROM license_plates WHERE plate_number = $1"#)
            .bind(plate)
            .execute(&mut **conn)
            .await?;

        if result.rows_affected() == 0 {
            Ok(DeleteOutcome::NotFound)
        } else {
            info!("Deleted plate {:?}", plate);
            Ok(DeleteOutcome::Deleted)
        }
    }

    async fn rename_plate(&self, old: &str, new: &str) -> anyhow::Result<RenameOutcome> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query(
            r#"UPDATE license_plates SET plate_number = $1 WHERE plate_number = $2"#,
        )
        .bind(new)
        .bind(old)
        .execute(&mut **conn)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(RenameOutcome::NotFound),
            Ok(_) => {
                info!("Renamed plate {:?} to {:?}", old, new);
                Ok(RenameOutcome::Renamed)
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                debug!("Cannot rename {:?}: {:?} is already registered", old, new);
                Ok(RenameOutcome::Conflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_plates(&self) -> anyhow::Result<Vec<RegisteredPlate>> {
        let mut conn = self.state.conn().await?;
        let rows: Vec<(i64, String)> =
            sqlx::query_as(r#"SELECT id, plate_number FROM license_plates ORDER BY id ASC"#)
                .fetch_all(&mut **conn)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, plate_number)| RegisteredPlate {
                id,
                plate_number,
                _guard: (),
            })
            .collect())
    }

    async fn clear_all(&self) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        sqlx::query(r#"DELETE FROM license_plates"#)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r#"DELETE FROM entry_logs"#)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r#"DELETE FROM exit_logs"#)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("Cleared registry and gate logs");
        Ok(())
    }
}

impl GateLogRepository for PlateRegistry {
    async fn log_event(&self, gate: Gate, plate: &str) -> anyhow::Result<GateEvent> {
        let sql = match gate {
            Gate::Entry => {
                r#"INSERT INTO entry_logs (plate_number, entry_time) VALUES ($1, $2) RETURNING id"#
            }
            Gate::Exit => {
                r#"INSERT INTO exit_logs (plate_number, exit_time) VALUES ($1, $2) RETURNING id"#
            }
        };
        let now = OffsetDateTime::now_utc();
        let timestamp = model::format_timestamp(now)?;

        let mut conn = self.state.conn().await?;
        let id: i64 = sqlx::query_scalar(sql)
            .bind(plate)
            .bind(&timestamp)
            .fetch_one(&mut **conn)
            .await?;

        debug!("Logged {} of {:?} at {}", gate, plate, timestamp);
        Ok(GateEvent {
            id,
            gate,
            plate_number: plate.to_string(),
            time: now,
            _guard: (),
        })
    }

    async fn get_events(&self, gate: Gate) -> anyhow::Result<Vec<GateEvent>> {
        let sql = match gate {
            Gate::Entry => r#"SELECT id, plate_number, entry_time FROM entry_logs ORDER BY id ASC"#,
            Gate::Exit => r#"SELECT id, plate_number, exit_time FROM exit_logs ORDER BY id ASC"#,
        };

        let mut conn = self.state.conn().await?;
        let rows: Vec<(i64, String, String)> = sqlx::query_as(sql).fetch_all(&mut **conn).await?;
        rows.into_iter()
            .map(|(id, plate_number, time)| {
                Ok(GateEvent {
                    id,
                    gate,
                    plate_number,
                    time: model::parse_timestamp(&time)?,
                    _guard: (),
                })
            })
            .collect()
    }
}
