//! Builds an engine from a scenario and summarizes the run.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::{ConfigError, GeneratorConfig, ScenarioConfig};
use crate::error::Result;
use crate::sim::dispatch::{ConstantDispatch, Dispatch, ScheduledDispatch};
use crate::sim::engine::Engine;
use crate::sim::fleet::Fleet;
use crate::sim::types::{SimConfig, StepRecord};
use crate::station::SessionGenerator;

/// Per-station totals over a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub id: String,
    /// Energy integrated into the station over the run (J).
    pub energy_delivered_j: f64,
    /// Stored energy after the last step (J).
    pub final_soc_j: f64,
    pub capacity_j: f64,
    /// Sessions in the station's schedule.
    pub sessions: usize,
}

/// Records and per-station totals of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records: Vec<StepRecord>,
    pub stations: Vec<StationSummary>,
}

/// Converts the scenario's timing section into a [`SimConfig`].
///
/// # Errors
///
/// Returns `SimError::Config` if `simulation.period_seconds` is not a
/// positive finite number. Other fields are left to [`ScenarioConfig::validate`].
pub fn sim_config(cfg: &ScenarioConfig) -> Result<SimConfig> {
    let s = &cfg.simulation;
    if !(s.period_seconds.is_finite() && s.period_seconds > 0.0) {
        return Err(ConfigError::new("simulation.period_seconds", "must be > 0").into());
    }
    let mut config = SimConfig::new(s.period_seconds, s.steps);
    config.enforce_presence = s.enforce_presence;
    config.apply_efficiency = s.apply_efficiency;
    Ok(config)
}

/// Builds trackers for configured and generated stations.
///
/// # Errors
///
/// Returns a `SimError` if a profile is invalid or an id is duplicated.
pub fn build_fleet(cfg: &ScenarioConfig, config: &SimConfig) -> Result<Fleet> {
    let mut fleet = Fleet::new();

    for st in &cfg.stations {
        let profile = st.profile()?;
        let tracker = profile
            .build_tracker(&st.id, st.rated_power_w, config.period_seconds)?
            .with_presence_enforcement(config.enforce_presence);
        fleet.insert(tracker, profile.efficiency)?;
    }

    if let Some(g) = &cfg.generator {
        let days = config.total_steps.div_ceil(config.steps_per_day());
        for i in 0..g.count {
            let mut generator = SessionGenerator::new(
                config.steps_per_day(),
                g.capacity_j,
                g.dwell_steps_min,
                g.dwell_steps_max,
                g.arrival_fraction_min,
                g.arrival_fraction_max,
                g.seed.wrapping_add(i as u64),
            );
            let id = GeneratorConfig::station_id(i);
            let profile = generator.profile(days);
            let tracker = profile
                .build_tracker(&id, g.rated_power_w, config.period_seconds)?
                .with_presence_enforcement(config.enforce_presence);
            fleet.insert(tracker, profile.efficiency)?;
        }
    }

    Ok(fleet)
}

/// Builds the dispatch source named by `dispatch.mode`.
pub fn build_dispatch(cfg: &ScenarioConfig) -> Dispatch {
    let d = &cfg.dispatch;
    match d.mode.as_str() {
        "schedule" => Dispatch::Scheduled(
            d.schedule
                .iter()
                .fold(ScheduledDispatch::new(d.power_w), |acc, (id, powers)| {
                    acc.with_schedule(id.clone(), powers.clone())
                }),
        ),
        _ => Dispatch::Constant(ConstantDispatch { power_w: d.power_w }),
    }
}

/// Builds a ready-to-run engine for the scenario.
///
/// # Errors
///
/// Returns a `SimError` if the fleet cannot be built.
pub fn build_engine(cfg: &ScenarioConfig) -> Result<Engine<Dispatch>> {
    let config = sim_config(cfg)?;
    let fleet = build_fleet(cfg, &config)?;
    info!(
        stations = fleet.len(),
        steps = config.total_steps,
        period_s = config.period_seconds,
        "init calculation service: set-up initial state-of-charge"
    );
    Ok(Engine::new(config, fleet, build_dispatch(cfg)))
}

/// Runs the scenario to completion.
///
/// # Errors
///
/// Returns a `SimError` if setup fails or a station violates its limits.
pub fn run_scenario(cfg: &ScenarioConfig) -> Result<RunSummary> {
    let mut engine = build_engine(cfg)?;
    let records = engine.run()?;
    let period = engine.config().period_seconds;

    let mut delivered: BTreeMap<&str, f64> = BTreeMap::new();
    for r in &records {
        *delivered.entry(r.station.as_str()).or_default() += r.applied_w * period;
    }

    let stations = engine
        .fleet()
        .iter()
        .map(|s| StationSummary {
            id: s.tracker.id().to_string(),
            energy_delivered_j: delivered.get(s.tracker.id()).copied().unwrap_or(0.0),
            final_soc_j: s.tracker.state_of_charge(),
            capacity_j: s.tracker.limits().capacity_j,
            sessions: s.tracker.schedule().len(),
        })
        .collect();

    Ok(RunSummary { records, stations })
}
