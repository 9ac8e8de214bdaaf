//! Charging station models: session schedules, charge-state tracking and profiles.

/// Seeded synthetic session profiles.
pub mod generator;
/// Profile records from energy-system descriptions.
pub mod profile;
/// Arrival/departure lookup.
pub mod schedule;
pub mod tracker;

pub use generator::SessionGenerator;
pub use profile::StationProfile;
pub use schedule::SessionSchedule;
pub use tracker::{ChargeStateTracker, DeviceLimits, POWER_TOLERANCE_W, Presence};
