//! Owning map from station id to its charge-state aggregate.

use std::collections::BTreeMap;

use crate::error::SimError;
use crate::station::ChargeStateTracker;

/// One managed station: its tracker plus the driver-side efficiency.
#[derive(Debug, Clone)]
pub struct Station {
    pub tracker: ChargeStateTracker,
    /// Charging efficiency applied by the driver when enabled (0..=1.0).
    pub efficiency: f64,
}

/// All stations of a run, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    stations: BTreeMap<String, Station>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a station keyed by its tracker id.
    ///
    /// # Errors
    ///
    /// Returns `SimError::DuplicateStation` if the id is already present.
    pub fn insert(&mut self, tracker: ChargeStateTracker, efficiency: f64) -> Result<(), SimError> {
        let id = tracker.id().to_string();
        if self.stations.contains_key(&id) {
            return Err(SimError::DuplicateStation(id));
        }
        self.stations.insert(id, Station { tracker, efficiency });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Exclusive access to one station's aggregate.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Station> {
        self.stations.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Station> {
        self.stations.values_mut()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
