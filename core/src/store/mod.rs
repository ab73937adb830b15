//! Observation persistence.
//!
//! RULE: Only store backends touch storage.
//! The ingestion service talks to `dyn ObservationStore` and never knows
//! which backend it has. Swapping memory for SQLite is a wiring change.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::{error::PalmResult, observation::Observation, types::ObservationId};
use std::sync::Arc;

/// Append-only observation storage.
///
/// An append is atomic with respect to `list_all`: a reader sees the set
/// either before or after the append, never a partial record.
pub trait ObservationStore: Send + Sync {
    /// Append one record. Records are never updated or removed.
    fn append(&self, observation: Observation) -> PalmResult<()>;

    /// Every stored record, in insertion order.
    fn list_all(&self) -> PalmResult<Vec<Observation>>;

    /// Highest id stored so far, if any. Used to resume id generation.
    fn last_id(&self) -> PalmResult<Option<ObservationId>>;
}

impl<S: ObservationStore + ?Sized> ObservationStore for Arc<S> {
    fn append(&self, observation: Observation) -> PalmResult<()> {
        (**self).append(observation)
    }

    fn list_all(&self) -> PalmResult<Vec<Observation>> {
        (**self).list_all()
    }

    fn last_id(&self) -> PalmResult<Option<ObservationId>> {
        (**self).last_id()
    }
}

/// Open the backend named by `database`: `None` keeps everything in
/// process memory, `Some(path)` opens (or creates) a SQLite file.
pub fn open(database: Option<&str>) -> PalmResult<Arc<dyn ObservationStore>> {
    match database {
        None => {
            log::info!("Using in-memory observation store (not persisted)");
            Ok(Arc::new(MemoryStore::new()))
        }
        Some(path) => {
            log::info!("Using SQLite observation store at {path}");
            let store = SqliteStore::open(path)?;
            store.migrate()?;
            Ok(Arc::new(store))
        }
    }
}
