//! Core simulation types: timing configuration and per-step records.

use std::fmt;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Centralized simulation configuration.
///
/// # Examples
///
/// ```
/// use ev_station_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(900.0, 96);
/// assert_eq!(cfg.steps_per_day(), 96);
/// assert_eq!(cfg.dt_hours(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Duration of one step in seconds.
    pub period_seconds: f64,
    /// Number of steps to run.
    pub total_steps: u64,
    /// Reject positive power for stations with no vehicle connected.
    pub enforce_presence: bool,
    /// Scale dispatched power by each station's efficiency before applying it.
    pub apply_efficiency: bool,
}

impl SimConfig {
    /// Creates a new simulation configuration with both policies off.
    ///
    /// # Panics
    ///
    /// Panics if `period_seconds` is not strictly positive.
    pub fn new(period_seconds: f64, total_steps: u64) -> Self {
        assert!(period_seconds > 0.0, "period_seconds must be > 0");
        Self {
            period_seconds,
            total_steps,
            enforce_presence: false,
            apply_efficiency: false,
        }
    }

    /// Steps per simulated day, rounded down and at least one.
    pub fn steps_per_day(&self) -> u64 {
        ((SECONDS_PER_DAY / self.period_seconds) as u64).max(1)
    }

    pub fn dt_hours(&self) -> f64 {
        self.period_seconds / 3600.0
    }
}

/// Record of one station over one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: u64,
    pub station: String,
    /// Energy published at the start of the step (J).
    pub reported_soc_j: f64,
    /// Power decided by the dispatch source (W).
    pub dispatch_w: f64,
    /// Power handed to the station after efficiency scaling (W).
    pub applied_w: f64,
    /// Stored energy at the end of the step (J).
    pub soc_after_j: f64,
    /// Whether a vehicle was connected during the step.
    pub plugged: bool,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step={:>4} | {} | soc={:>14.1} J  dispatch={:>9.2} W  applied={:>9.2} W  \
             -> {:>14.1} J | plugged={}",
            self.step,
            self.station,
            self.reported_soc_j,
            self.dispatch_w,
            self.applied_w,
            self.soc_after_j,
            self.plugged,
        )
    }
}
