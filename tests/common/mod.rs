//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use ev_station_sim::sim::fleet::Fleet;
use ev_station_sim::sim::types::SimConfig;
use ev_station_sim::station::{ChargeStateTracker, StationProfile};

/// Id of the station in the reference fixture.
pub const REFERENCE_ID: &str = "e19a105b-97cb-4e3e-8767-67a9764b77f6";

/// Quarter-hour steps.
pub const PERIOD_SECONDS: f64 = 900.0;

/// Rated power of the reference charger (W).
pub const REFERENCE_POWER_W: f64 = 11_000.0;

/// Reference description: one session arriving at step 74, 10 kWh battery.
pub const REFERENCE_DESCRIPTION: &str = r#"{
    "arrival_ptus": [74],
    "departure_ptus": [90],
    "arrival_socs": [179197200.0],
    "max_soc": 36000000.0,
    "efficiency": 1.0
}"#;

/// Tracker built from the reference description.
pub fn reference_tracker() -> ChargeStateTracker {
    StationProfile::from_description(REFERENCE_ID, REFERENCE_DESCRIPTION)
        .and_then(|p| p.build_tracker(REFERENCE_ID, REFERENCE_POWER_W, PERIOD_SECONDS))
        .expect("reference fixture should build")
}

/// Tracker for a station with the given sessions and limits.
pub fn tracker(
    id: &str,
    arrivals: &[u64],
    departures: &[u64],
    socs: &[f64],
    rated_power_w: f64,
    capacity_j: f64,
) -> ChargeStateTracker {
    let profile = StationProfile {
        arrival_ptus: arrivals.to_vec(),
        departure_ptus: departures.to_vec(),
        arrival_socs: socs.to_vec(),
        max_soc: capacity_j,
        efficiency: 1.0,
    };
    profile
        .build_tracker(id, rated_power_w, PERIOD_SECONDS)
        .expect("fixture should build")
}

/// Fleet holding the given trackers with unit efficiency.
pub fn fleet_of(trackers: Vec<ChargeStateTracker>) -> Fleet {
    let mut fleet = Fleet::new();
    for t in trackers {
        fleet.insert(t, 1.0).expect("unique ids");
    }
    fleet
}

/// Quarter-hour configuration running `steps` steps.
pub fn config(steps: u64) -> SimConfig {
    SimConfig::new(PERIOD_SECONDS, steps)
}
