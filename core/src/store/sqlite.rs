//! SQLite-backed store. Survives restarts.

use super::ObservationStore;
use crate::{
    error::PalmResult,
    observation::{Observation, RipenessStatus},
    types::ObservationId,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, types::Type, Connection, OpenFlags};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> PalmResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL only applies to real files; memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a private in-memory database (used in tests).
    pub fn in_memory() -> PalmResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PalmResult<()> {
        self.conn
            .lock()
            .execute_batch(include_str!("../../../migrations/001_observations.sql"))?;
        Ok(())
    }
}

impl ObservationStore for SqliteStore {
    fn append(&self, observation: Observation) -> PalmResult<()> {
        self.conn.lock().execute(
            "INSERT INTO observation (id, device_id, lat, lng, status, received_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                observation.id as i64,
                observation.device_id,
                observation.lat,
                observation.lng,
                observation.status.as_str(),
                observation.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn list_all(&self) -> PalmResult<Vec<Observation>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, device_id, lat, lng, status, received_at
             FROM observation ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let received_at: String = row.get(5)?;
            let timestamp = DateTime::parse_from_rfc3339(&received_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);
            Ok(Observation {
                id:        row.get::<_, i64>(0)? as ObservationId,
                device_id: row.get(1)?,
                lat:       row.get(2)?,
                lng:       row.get(3)?,
                status:    RipenessStatus::from(row.get::<_, String>(4)?),
                timestamp,
            })
        })?;
        let observations = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(observations)
    }

    fn last_id(&self) -> PalmResult<Option<ObservationId>> {
        let max: Option<i64> = self.conn.lock().query_row(
            "SELECT MAX(id) FROM observation",
            [],
            |row| row.get(0),
        )?;
        Ok(max.map(|id| id as ObservationId))
    }
}
