//! Error types for station state tracking, profile loading and simulation runs.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Fatal violations raised by a station's charge-state update.
///
/// Neither variant is recoverable in place: the driver aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChargeError {
    /// Requested power (after tolerance snapping) is above the rated maximum.
    #[error("station {station} is charging more than its max power at step {step}: {power_w} W > {max_w} W")]
    ChargeRateExceeded {
        station: String,
        step: u64,
        power_w: f64,
        max_w: f64,
    },

    /// Integrated energy left `[0, capacity]` beyond the rounding band.
    #[error("station {station} is charged over/under its capacity at step {step}: {soc_j} J not in [0, {capacity_j}] J")]
    CapacityViolation {
        station: String,
        step: u64,
        soc_j: f64,
        capacity_j: f64,
    },

    /// Positive power was applied while no vehicle is plugged in.
    #[error("station {station} received {power_w} W at step {step} with no vehicle connected")]
    ChargingWhileUnplugged {
        station: String,
        step: u64,
        power_w: f64,
    },
}

/// Malformed per-station profile data.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("station {station}: invalid description JSON: {source}")]
    Json {
        station: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("station {station}: {field} - {message}")]
    Invalid {
        station: String,
        field: &'static str,
        message: String,
    },
}

impl ProfileError {
    /// Create a new field-level validation error.
    pub fn invalid<S: Into<String>>(station: &str, field: &'static str, message: S) -> Self {
        ProfileError::Invalid {
            station: station.to_string(),
            field,
            message: message.into(),
        }
    }
}

/// Top-level error for a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Charge(#[from] ChargeError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("duplicate station id \"{0}\"")]
    DuplicateStation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_rate_message_names_station_and_limit() {
        let err = ChargeError::ChargeRateExceeded {
            station: "ev-1".to_string(),
            step: 3,
            power_w: 12000.0,
            max_w: 11000.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("ev-1"));
        assert!(msg.contains("12000 W > 11000 W"));
    }

    #[test]
    fn charge_error_converts_into_sim_error() {
        let err: SimError = ChargeError::CapacityViolation {
            station: "ev-1".to_string(),
            step: 4,
            soc_j: 2.0,
            capacity_j: 1.0,
        }
        .into();
        assert!(matches!(
            err,
            SimError::Charge(ChargeError::CapacityViolation { .. })
        ));
    }

    #[test]
    fn profile_error_display() {
        let err = ProfileError::invalid("ev-2", "arrival_socs", "length mismatch");
        assert_eq!(err.to_string(), "station ev-2: arrival_socs - length mismatch");
    }
}
