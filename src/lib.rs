//! Charge-state simulation for EV charging stations driven step by step.

pub mod cli;
/// Scenario configuration and presets.
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod reporting;
pub mod runner;
/// Simulation clock, fleet, dispatch and engine.
pub mod sim;
pub mod station;
