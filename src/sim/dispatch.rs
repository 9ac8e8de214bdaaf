//! Dispatch sources standing in for the external charging controller.

use std::collections::HashMap;

/// Supplies the charging power decided for a station at a step.
pub trait DispatchSource {
    /// Returns the power (W) to apply to `station` during `step`.
    ///
    /// `reported_soc_j` is the energy the station published at the start of
    /// the same step.
    fn dispatch_w(&mut self, station: &str, step: u64, reported_soc_j: f64) -> f64;
}

/// Same power for every station at every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDispatch {
    pub power_w: f64,
}

impl DispatchSource for ConstantDispatch {
    fn dispatch_w(&mut self, _station: &str, _step: u64, _reported_soc_j: f64) -> f64 {
        self.power_w
    }
}

/// Per-station power tables indexed by 1-based step.
///
/// Steps beyond a table, and stations without one, get `default_w`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduledDispatch {
    pub default_w: f64,
    schedules: HashMap<String, Vec<f64>>,
}

impl ScheduledDispatch {
    pub fn new(default_w: f64) -> Self {
        Self {
            default_w,
            schedules: HashMap::new(),
        }
    }

    /// Sets the power table for `station`; entry `i` applies to step `i + 1`.
    pub fn with_schedule(mut self, station: impl Into<String>, powers_w: Vec<f64>) -> Self {
        self.schedules.insert(station.into(), powers_w);
        self
    }
}

impl DispatchSource for ScheduledDispatch {
    fn dispatch_w(&mut self, station: &str, step: u64, _reported_soc_j: f64) -> f64 {
        step.checked_sub(1)
            .and_then(|i| self.schedules.get(station)?.get(i as usize).copied())
            .unwrap_or(self.default_w)
    }
}

/// Either dispatch mode, chosen from configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Constant(ConstantDispatch),
    Scheduled(ScheduledDispatch),
}

impl DispatchSource for Dispatch {
    fn dispatch_w(&mut self, station: &str, step: u64, reported_soc_j: f64) -> f64 {
        match self {
            Dispatch::Constant(d) => d.dispatch_w(station, step, reported_soc_j),
            Dispatch::Scheduled(d) => d.dispatch_w(station, step, reported_soc_j),
        }
    }
}
