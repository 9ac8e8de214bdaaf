//! Simulation driver: publishes every station's energy, collects dispatch, applies it.

use tracing::{error, info, info_span};

use crate::error::ChargeError;
use crate::station::Presence;

use super::clock::Clock;
use super::dispatch::DispatchSource;
use super::fleet::Fleet;
use super::types::{SimConfig, StepRecord};

/// Upper bound on steps whose records are reserved before a run starts.
const MAX_RESERVED_STEPS: u64 = 4096;

/// Simulation engine owning the fleet, the dispatch source and the configuration.
///
/// Generic over `D: DispatchSource` for static dispatch.
pub struct Engine<D: DispatchSource> {
    config: SimConfig,
    fleet: Fleet,
    dispatch: D,
}

impl<D: DispatchSource> Engine<D> {
    pub fn new(config: SimConfig, fleet: Fleet, dispatch: D) -> Self {
        Self {
            config,
            fleet,
            dispatch,
        }
    }

    /// Executes one step for every station.
    ///
    /// All stations report before any dispatch is requested, matching the
    /// publish-then-update ordering of a co-simulation round.
    ///
    /// # Errors
    ///
    /// Returns the first `ChargeError` raised by a station. Stations later in
    /// id order are not updated for this step.
    pub fn step(&mut self, step: u64) -> Result<Vec<StepRecord>, ChargeError> {
        let _span = info_span!("step", step).entered();
        let elapsed_s = step.saturating_sub(1) as f64 * self.config.period_seconds;
        info!(elapsed_s, "time step started");

        let mut records = Vec::with_capacity(self.fleet.len());
        for station in self.fleet.iter_mut() {
            let reported_soc_j = station.tracker.report_state_of_charge(step);
            records.push(StepRecord {
                step,
                station: station.tracker.id().to_string(),
                reported_soc_j,
                dispatch_w: 0.0,
                applied_w: 0.0,
                soc_after_j: reported_soc_j,
                plugged: station.tracker.presence() != Presence::Unplugged,
            });
        }

        for (station, record) in self.fleet.iter_mut().zip(records.iter_mut()) {
            let dispatch_w = self
                .dispatch
                .dispatch_w(&record.station, step, record.reported_soc_j);
            let applied_w = if self.config.apply_efficiency {
                dispatch_w * station.efficiency
            } else {
                dispatch_w
            };

            station.tracker.apply_charging_power(applied_w, step)?;

            record.dispatch_w = dispatch_w;
            record.applied_w = applied_w;
            record.soc_after_j = station.tracker.state_of_charge();
        }

        Ok(records)
    }

    /// Executes all steps and returns the records, aborting on the first error.
    ///
    /// # Errors
    ///
    /// Returns the `ChargeError` that terminated the run.
    pub fn run(&mut self) -> Result<Vec<StepRecord>, ChargeError> {
        let total = self.config.total_steps;
        let reserve = usize::try_from(total.min(MAX_RESERVED_STEPS))
            .ok()
            .and_then(|steps| steps.checked_mul(self.fleet.len()))
            .unwrap_or(0);
        let mut results = Vec::with_capacity(reserve);
        let mut clock = Clock::new(total);

        clock
            .try_run(|step| {
                results.extend(self.step(step)?);
                Ok::<(), ChargeError>(())
            })
            .inspect_err(|e| error!("simulation terminated: {e}"))?;

        info!(steps = total, stations = self.fleet.len(), "simulation finished");
        Ok(results)
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
