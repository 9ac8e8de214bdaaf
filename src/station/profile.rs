//! Per-station profile records as carried in an energy-system description.

use serde::Deserialize;

use crate::error::ProfileError;
use crate::station::schedule::SessionSchedule;
use crate::station::tracker::{ChargeStateTracker, DeviceLimits};

fn default_efficiency() -> f64 {
    1.0
}

/// Session and battery data for one charging station.
///
/// Step indices are 0-based; energies are in joules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationProfile {
    pub arrival_ptus: Vec<u64>,
    pub departure_ptus: Vec<u64>,
    pub arrival_socs: Vec<f64>,
    /// Battery capacity (J).
    pub max_soc: f64,
    /// Charging efficiency (0..=1.0).
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
}

impl StationProfile {
    /// Parses the JSON description string attached to a station.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if the JSON is malformed or has unknown keys.
    pub fn from_description(station: &str, description: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(description).map_err(|source| ProfileError::Json {
            station: station.to_string(),
            source,
        })
    }

    /// Builds the session schedule for this profile.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if the session lists are inconsistent.
    pub fn schedule(&self, station: &str) -> Result<SessionSchedule, ProfileError> {
        SessionSchedule::new(
            station,
            self.arrival_ptus.clone(),
            self.departure_ptus.clone(),
            self.arrival_socs.clone(),
        )
    }

    /// Builds a tracker for `station` with the given rated power (W).
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if the efficiency is outside `(0, 1]` or the
    /// schedule or limits are invalid.
    pub fn build_tracker(
        &self,
        station: &str,
        rated_power_w: f64,
        period_seconds: f64,
    ) -> Result<ChargeStateTracker, ProfileError> {
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(ProfileError::invalid(
                station,
                "efficiency",
                format!("must be in (0.0, 1.0], got {}", self.efficiency),
            ));
        }

        let limits = DeviceLimits {
            max_charge_rate_w: rated_power_w,
            capacity_j: self.max_soc,
        };
        ChargeStateTracker::new(station, self.schedule(station)?, limits, period_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = r#"{
        "arrival_ptus": [74],
        "departure_ptus": [90],
        "arrival_socs": [179197200.0],
        "max_soc": 36000000.0,
        "efficiency": 0.9
    }"#;

    #[test]
    fn parses_description() {
        let p = StationProfile::from_description("ev", DESCRIPTION).expect("valid json");
        assert_eq!(p.arrival_ptus, vec![74]);
        assert_eq!(p.departure_ptus, vec![90]);
        assert_eq!(p.max_soc, 36_000_000.0);
        assert_eq!(p.efficiency, 0.9);
    }

    #[test]
    fn efficiency_defaults_to_one() {
        let json = r#"{"arrival_ptus":[0],"departure_ptus":[4],"arrival_socs":[10.0],"max_soc":100.0}"#;
        let p = StationProfile::from_description("ev", json).expect("valid json");
        assert_eq!(p.efficiency, 1.0);
    }

    #[test]
    fn rejects_unknown_keys() {
        let json = r#"{"arrival_ptus":[],"departure_ptus":[],"arrival_socs":[],"max_soc":1.0,"colour":"red"}"#;
        let err = StationProfile::from_description("ev", json);
        assert!(matches!(err, Err(ProfileError::Json { .. })));
    }

    #[test]
    fn builds_tracker_with_initial_state() {
        let json = r#"{"arrival_ptus":[0,8],"departure_ptus":[4,12],"arrival_socs":[10.0,20.0],"max_soc":100.0}"#;
        let p = StationProfile::from_description("ev", json).expect("valid json");
        let t = p.build_tracker("ev", 5.0, 1.0).expect("valid tracker");
        assert_eq!(t.state_of_charge(), 10.0);
        assert_eq!(t.limits().max_charge_rate_w, 5.0);
        assert_eq!(t.limits().capacity_j, 100.0);
    }

    #[test]
    fn rejects_bad_efficiency() {
        let mut p = StationProfile::from_description("ev", DESCRIPTION).expect("valid json");
        p.efficiency = 1.5;
        assert!(p.build_tracker("ev", 11000.0, 900.0).is_err());
    }
}
