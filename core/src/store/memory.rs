//! Volatile store. Lives exactly as long as the process.

use super::ObservationStore;
use crate::{error::PalmResult, observation::Observation, types::ObservationId};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    observations: RwLock<Vec<Observation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.read().is_empty()
    }
}

impl ObservationStore for MemoryStore {
    fn append(&self, observation: Observation) -> PalmResult<()> {
        self.observations.write().push(observation);
        Ok(())
    }

    fn list_all(&self) -> PalmResult<Vec<Observation>> {
        Ok(self.observations.read().clone())
    }

    fn last_id(&self) -> PalmResult<Option<ObservationId>> {
        Ok(self.observations.read().iter().map(|o| o.id).max())
    }
}
