/// Simulation clock for step numbering.
pub mod clock;
pub mod dispatch;
pub mod engine;
/// Owning map of managed stations.
pub mod fleet;
pub mod types;
