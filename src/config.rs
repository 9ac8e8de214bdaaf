//! TOML-based scenario configuration and preset definitions.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::ProfileError;
use crate::station::StationProfile;

/// Environment variable overriding `simulation.period_seconds`.
pub const ENV_PERIOD_SECONDS: &str = "EV_SIM_PERIOD_SECONDS";
/// Environment variable overriding `simulation.steps`.
pub const ENV_STEPS: &str = "EV_SIM_STEPS";

/// Top-level scenario configuration parsed from TOML.
///
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or use one of the
/// built-in presets via [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and policies.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Explicitly described stations.
    #[serde(default)]
    pub stations: Vec<StationConfig>,
    /// Synthetic stations with random sessions.
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
    /// Source of per-step charging power.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Simulation timing and policies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Duration of one step in seconds (must be > 0).
    pub period_seconds: f64,
    /// Number of steps to run (must be > 0).
    pub steps: u64,
    /// Reject positive power while a station has no vehicle connected.
    pub enforce_presence: bool,
    /// Scale dispatched power by each station's efficiency.
    pub apply_efficiency: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            period_seconds: 900.0,
            steps: 96,
            enforce_presence: false,
            apply_efficiency: false,
        }
    }
}

/// One charging station.
///
/// The profile comes either from a JSON `description` string or from the
/// inline profile fields, never both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationConfig {
    pub id: String,
    /// Rated charging power (W).
    pub rated_power_w: f64,
    pub description: Option<String>,
    pub arrival_ptus: Option<Vec<u64>>,
    pub departure_ptus: Option<Vec<u64>>,
    pub arrival_socs: Option<Vec<f64>>,
    /// Battery capacity (J).
    pub max_soc: Option<f64>,
    pub efficiency: Option<f64>,
}

impl StationConfig {
    fn has_inline_profile(&self) -> bool {
        self.arrival_ptus.is_some()
            || self.departure_ptus.is_some()
            || self.arrival_socs.is_some()
            || self.max_soc.is_some()
            || self.efficiency.is_some()
    }

    /// Resolves the station's profile.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if the description is malformed or required
    /// inline fields are missing.
    pub fn profile(&self) -> Result<StationProfile, ProfileError> {
        if let Some(description) = &self.description {
            return StationProfile::from_description(&self.id, description);
        }

        let missing = |field| ProfileError::invalid(&self.id, field, "missing");
        Ok(StationProfile {
            arrival_ptus: self.arrival_ptus.clone().ok_or_else(|| missing("arrival_ptus"))?,
            departure_ptus: self
                .departure_ptus
                .clone()
                .ok_or_else(|| missing("departure_ptus"))?,
            arrival_socs: self.arrival_socs.clone().ok_or_else(|| missing("arrival_socs"))?,
            max_soc: self.max_soc.ok_or_else(|| missing("max_soc"))?,
            efficiency: self.efficiency.unwrap_or(1.0),
        })
    }
}

/// Synthetic fleet parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of generated stations.
    pub count: usize,
    /// Master random seed; station `i` uses `seed + i`.
    pub seed: u64,
    /// Rated charging power (W).
    pub rated_power_w: f64,
    /// Battery capacity (J).
    pub capacity_j: f64,
    /// Minimum dwell duration (steps).
    pub dwell_steps_min: u64,
    /// Maximum dwell duration (steps).
    pub dwell_steps_max: u64,
    /// Minimum arrival energy as a fraction of capacity.
    pub arrival_fraction_min: f64,
    /// Maximum arrival energy as a fraction of capacity.
    pub arrival_fraction_max: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 4,
            seed: 42,
            rated_power_w: 11_000.0,
            capacity_j: 36_000_000.0,
            dwell_steps_min: 8,
            dwell_steps_max: 40,
            arrival_fraction_min: 0.1,
            arrival_fraction_max: 0.5,
        }
    }
}

impl GeneratorConfig {
    /// Id of the `index`-th generated station.
    pub fn station_id(index: usize) -> String {
        format!("ev-gen-{index:04}")
    }
}

/// Dispatch source parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// `"constant"` or `"schedule"`.
    pub mode: String,
    /// Constant power, or the fallback for steps without a scheduled value (W).
    pub power_w: f64,
    /// Per-station power tables; entry `i` applies to step `i + 1` (W).
    pub schedule: BTreeMap<String, Vec<f64>>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: "constant".to_string(),
            power_w: 0.0,
            schedule: BTreeMap::new(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.period_seconds"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    /// Create a field-level configuration error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Single 11 kW station with a 10 kWh battery, charged at full power for
    /// three quarter-hour steps.
    pub fn reference() -> Self {
        let id = "e19a105b-97cb-4e3e-8767-67a9764b77f6";
        let mut schedule = BTreeMap::new();
        schedule.insert(id.to_string(), vec![11_000.0; 3]);

        Self {
            simulation: SimulationConfig {
                steps: 8,
                ..SimulationConfig::default()
            },
            stations: vec![StationConfig {
                id: id.to_string(),
                rated_power_w: 11_000.0,
                arrival_ptus: Some(vec![0]),
                departure_ptus: Some(vec![6]),
                arrival_socs: Some(vec![0.0]),
                max_soc: Some(36_000_000.0),
                efficiency: Some(1.0),
                ..StationConfig::default()
            }],
            generator: None,
            dispatch: DispatchConfig {
                mode: "schedule".to_string(),
                power_w: 0.0,
                schedule,
            },
        }
    }

    /// One station with a morning and an evening session.
    pub fn two_sessions() -> Self {
        let id = "ev-home";
        let mut powers = vec![0.0; 96];
        powers[1..9].fill(7_400.0);
        powers[41..49].fill(3_700.0);
        let mut schedule = BTreeMap::new();
        schedule.insert(id.to_string(), powers);

        Self {
            simulation: SimulationConfig {
                enforce_presence: true,
                ..SimulationConfig::default()
            },
            stations: vec![StationConfig {
                id: id.to_string(),
                rated_power_w: 7_400.0,
                description: Some(
                    r#"{"arrival_ptus":[0,40],"departure_ptus":[24,70],"arrival_socs":[36000000.0,72000000.0],"max_soc":216000000.0,"efficiency":0.92}"#
                        .to_string(),
                ),
                ..StationConfig::default()
            }],
            generator: None,
            dispatch: DispatchConfig {
                mode: "schedule".to_string(),
                power_w: 0.0,
                schedule,
            },
        }
    }

    /// Generated fleet over two days with a low constant trickle charge.
    pub fn synthetic() -> Self {
        Self {
            simulation: SimulationConfig {
                steps: 192,
                ..SimulationConfig::default()
            },
            stations: Vec::new(),
            generator: Some(GeneratorConfig::default()),
            dispatch: DispatchConfig {
                power_w: 80.0,
                ..DispatchConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "two_sessions", "synthetic"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::reference()),
            "two_sessions" => Ok(Self::two_sessions()),
            "synthetic" => Ok(Self::synthetic()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Applies `EV_SIM_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if an override cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(std::env::vars())
    }

    /// Applies `EV_SIM_*` overrides from key/value pairs; other keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if an override cannot be parsed.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_PERIOD_SECONDS => {
                    self.simulation.period_seconds = value.parse().map_err(|_| {
                        ConfigError::new(ENV_PERIOD_SECONDS, format!("\"{value}\" is not a number"))
                    })?;
                }
                ENV_STEPS => {
                    self.simulation.steps = value.parse().map_err(|_| {
                        ConfigError::new(ENV_STEPS, format!("\"{value}\" is not a u64"))
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !(s.period_seconds.is_finite() && s.period_seconds > 0.0) {
            errors.push(ConfigError::new("simulation.period_seconds", "must be > 0"));
        }
        if s.steps == 0 {
            errors.push(ConfigError::new("simulation.steps", "must be > 0"));
        }

        let mut ids = HashSet::new();
        for (i, st) in self.stations.iter().enumerate() {
            let field = |name: &str| format!("stations[{i}].{name}");
            if st.id.is_empty() {
                errors.push(ConfigError::new(field("id"), "must not be empty"));
            } else if !ids.insert(st.id.as_str()) {
                errors.push(ConfigError::new(
                    field("id"),
                    format!("duplicate station id \"{}\"", st.id),
                ));
            }
            if !(st.rated_power_w.is_finite() && st.rated_power_w >= 0.0) {
                errors.push(ConfigError::new(field("rated_power_w"), "must be >= 0"));
            }
            if st.description.is_some() && st.has_inline_profile() {
                errors.push(ConfigError::new(
                    field("description"),
                    "cannot be combined with inline profile fields",
                ));
            } else if let Err(e) = st.profile() {
                errors.push(ConfigError::new(field("profile"), e.to_string()));
            }
        }

        let mut generated = Vec::new();
        if let Some(g) = &self.generator {
            if g.count == 0 {
                errors.push(ConfigError::new("generator.count", "must be > 0"));
            }
            if !(g.rated_power_w.is_finite() && g.rated_power_w >= 0.0) {
                errors.push(ConfigError::new("generator.rated_power_w", "must be >= 0"));
            }
            if !(g.capacity_j.is_finite() && g.capacity_j > 0.0) {
                errors.push(ConfigError::new("generator.capacity_j", "must be > 0"));
            }
            if g.dwell_steps_min == 0 || g.dwell_steps_min > g.dwell_steps_max {
                errors.push(ConfigError::new(
                    "generator.dwell_steps_min",
                    "must be > 0 and <= generator.dwell_steps_max",
                ));
            }
            if !(0.0..=1.0).contains(&g.arrival_fraction_min)
                || !(g.arrival_fraction_min..=1.0).contains(&g.arrival_fraction_max)
            {
                errors.push(ConfigError::new(
                    "generator.arrival_fraction_min",
                    "must satisfy 0.0 <= min <= max <= 1.0",
                ));
            }
            generated = (0..g.count).map(GeneratorConfig::station_id).collect();
        }
        for id in &generated {
            if ids.contains(id.as_str()) {
                errors.push(ConfigError::new(
                    "generator.count",
                    format!("generated id \"{id}\" collides with a configured station"),
                ));
            }
        }

        let d = &self.dispatch;
        if d.mode != "constant" && d.mode != "schedule" {
            errors.push(ConfigError::new(
                "dispatch.mode",
                format!("must be \"constant\" or \"schedule\", got \"{}\"", d.mode),
            ));
        }
        if !d.power_w.is_finite() {
            errors.push(ConfigError::new("dispatch.power_w", "must be finite"));
        }
        for key in d.schedule.keys() {
            if !ids.contains(key.as_str()) && !generated.contains(key) {
                errors.push(ConfigError::new(
                    format!("dispatch.schedule.{key}"),
                    "unknown station",
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_is_valid() {
        let errors = ScenarioConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
period_seconds = 900.0
steps = 4
apply_efficiency = true

[[stations]]
id = "ev-1"
rated_power_w = 11000.0
arrival_ptus = [0]
departure_ptus = [3]
arrival_socs = [1000.0]
max_soc = 36000000.0

[[stations]]
id = "ev-2"
rated_power_w = 7400.0
description = '{"arrival_ptus":[2],"departure_ptus":[3],"arrival_socs":[0.0],"max_soc":1.0e7}'

[dispatch]
mode = "schedule"
power_w = 0.0

[dispatch.schedule]
ev-1 = [11000.0, 11000.0]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.stations.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.steps), Some(4));
        let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
steps = 24
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
steps = 10
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.steps), Some(10));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.period_seconds), Some(900.0));
        assert_eq!(cfg.as_ref().map(|c| c.dispatch.mode.as_str()), Some("constant"));
    }

    #[test]
    fn validation_catches_zero_period() {
        let mut cfg = ScenarioConfig::reference();
        cfg.simulation.period_seconds = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.period_seconds"));
    }

    #[test]
    fn validation_catches_duplicate_ids() {
        let mut cfg = ScenarioConfig::reference();
        cfg.stations.push(cfg.stations[0].clone());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn validation_catches_missing_profile_fields() {
        let mut cfg = ScenarioConfig::reference();
        cfg.stations[0].max_soc = None;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "stations[0].profile"));
    }

    #[test]
    fn validation_catches_mixed_profile_sources() {
        let mut cfg = ScenarioConfig::reference();
        cfg.stations[0].description = Some("{}".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "stations[0].description"));
    }

    #[test]
    fn validation_catches_bad_dispatch_mode() {
        let mut cfg = ScenarioConfig::reference();
        cfg.dispatch.mode = "optimal".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "dispatch.mode"));
    }

    #[test]
    fn validation_catches_schedule_for_unknown_station() {
        let mut cfg = ScenarioConfig::reference();
        cfg.dispatch.schedule.insert("ghost".to_string(), vec![1.0]);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "dispatch.schedule.ghost"));
    }

    #[test]
    fn schedule_may_target_generated_station() {
        let mut cfg = ScenarioConfig::synthetic();
        cfg.dispatch
            .schedule
            .insert(GeneratorConfig::station_id(0), vec![1.0]);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn overrides_replace_timing() {
        let mut cfg = ScenarioConfig::reference();
        cfg.apply_overrides([(ENV_PERIOD_SECONDS, "60"), (ENV_STEPS, "5"), ("HOME", "/root")])
            .expect("valid overrides");
        assert_eq!(cfg.simulation.period_seconds, 60.0);
        assert_eq!(cfg.simulation.steps, 5);
    }

    #[test]
    fn overrides_reject_garbage() {
        let mut cfg = ScenarioConfig::reference();
        let err = cfg.apply_overrides([(ENV_STEPS, "many")]);
        assert!(matches!(err, Err(e) if e.field == ENV_STEPS));
    }
}
