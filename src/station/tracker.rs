//! Per-station state of charge and the two step operations acting on it.

use tracing::{debug, info, warn};

use crate::error::{ChargeError, ProfileError};
use crate::station::schedule::SessionSchedule;

/// Power within this distance above the rated maximum is treated as the maximum (W).
pub const POWER_TOLERANCE_W: f64 = 0.001;

/// Static electrical limits of a charging station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceLimits {
    /// Maximum instantaneous charging power (W).
    pub max_charge_rate_w: f64,
    /// Maximum stored energy (J).
    pub capacity_j: f64,
}

/// Whether a vehicle is currently connected to the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Unplugged,
    /// Connected for the session with the given schedule index.
    Charging { session: usize },
}

/// Charge-state machine for one EV charging station.
///
/// Each simulated step the driver first calls
/// [`report_state_of_charge`](Self::report_state_of_charge) and, once the
/// controller has decided a power, [`apply_charging_power`](Self::apply_charging_power).
///
/// Step numbers passed to `report_state_of_charge` must be 1-based and increase
/// by exactly one per call. Skipped or repeated steps are not supported; the
/// tracker logs a warning when it sees one but does not correct for it.
#[derive(Debug, Clone)]
pub struct ChargeStateTracker {
    id: String,
    schedule: SessionSchedule,
    limits: DeviceLimits,
    period_seconds: f64,
    state_of_charge: f64,
    presence: Presence,
    enforce_presence: bool,
    last_reported_step: Option<u64>,
}

impl ChargeStateTracker {
    /// Creates a tracker starting from the schedule's initial state.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable station identifier
    /// * `schedule` - Arrival/departure lookup for this station
    /// * `limits` - Rated power and capacity
    /// * `period_seconds` - Duration of one simulation step
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if the rated power is negative, or the capacity
    /// or period is not strictly positive.
    pub fn new(
        id: impl Into<String>,
        schedule: SessionSchedule,
        limits: DeviceLimits,
        period_seconds: f64,
    ) -> Result<Self, ProfileError> {
        let id = id.into();

        if !limits.max_charge_rate_w.is_finite() || limits.max_charge_rate_w < 0.0 {
            return Err(ProfileError::invalid(&id, "power", "must be finite and >= 0"));
        }
        if !limits.capacity_j.is_finite() || limits.capacity_j <= 0.0 {
            return Err(ProfileError::invalid(&id, "max_soc", "must be finite and > 0"));
        }
        if !period_seconds.is_finite() || period_seconds <= 0.0 {
            return Err(ProfileError::invalid(
                &id,
                "period_seconds",
                "must be finite and > 0",
            ));
        }

        let presence = match schedule.session_at(0) {
            Some(session) => Presence::Charging { session },
            None => Presence::Unplugged,
        };

        Ok(Self {
            state_of_charge: schedule.initial_state(),
            id,
            schedule,
            limits,
            period_seconds,
            presence,
            enforce_presence: false,
            last_reported_step: None,
        })
    }

    /// Rejects positive power while no vehicle is connected.
    pub fn with_presence_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_presence = enforce;
        self
    }

    /// Returns the stored energy to publish at the start of `current_step`.
    ///
    /// A session that arrived at `current_step - 1` overwrites the stored
    /// energy with its arrival energy. A departure at `current_step - 1` marks
    /// the station unplugged but leaves the stored energy in place.
    pub fn report_state_of_charge(&mut self, current_step: u64) -> f64 {
        if let Some(last) = self.last_reported_step {
            if current_step != last + 1 {
                warn!(
                    station = %self.id,
                    last, current_step, "non-consecutive step number reported"
                );
            }
        }
        self.last_reported_step = Some(current_step);

        if let Some(previous_step) = current_step.checked_sub(1) {
            if self.schedule.departure_at(previous_step) {
                self.presence = Presence::Unplugged;
            }
            if let Some(session) = self.schedule.session_at(previous_step) {
                self.state_of_charge = self.schedule.arrival_socs()[session];
                self.presence = Presence::Charging { session };
                info!(
                    station = %self.id,
                    session,
                    soc_j = self.state_of_charge,
                    "vehicle arrived"
                );
            }
        }

        debug!(station = %self.id, step = current_step, soc_j = self.state_of_charge, "sends");
        self.state_of_charge
    }

    /// Integrates `power_w` over one step into the stored energy.
    ///
    /// Power up to [`POWER_TOLERANCE_W`] above the rated maximum is snapped to
    /// the maximum. After integration, energy whose ceiling is zero snaps to
    /// `0.0`, and energy above capacity whose floor is within capacity snaps
    /// to the capacity.
    ///
    /// # Errors
    ///
    /// * `ChargeRateExceeded` - power above the rated maximum after snapping
    /// * `ChargingWhileUnplugged` - positive power while unplugged, only with
    ///   presence enforcement on
    /// * `CapacityViolation` - corrected energy outside `[0, capacity]`
    ///
    /// The stored energy is unchanged when an error is returned.
    pub fn apply_charging_power(&mut self, power_w: f64, step: u64) -> Result<(), ChargeError> {
        let max_w = self.limits.max_charge_rate_w;
        let capacity_j = self.limits.capacity_j;
        info!(station = %self.id, step, "to charge: {power_w}/{max_w}");

        let mut power = power_w;
        if power >= max_w && power - max_w < POWER_TOLERANCE_W {
            power = max_w;
        }
        if power.is_nan() || power > max_w {
            return Err(ChargeError::ChargeRateExceeded {
                station: self.id.clone(),
                step,
                power_w,
                max_w,
            });
        }
        if self.enforce_presence && power > 0.0 && self.presence == Presence::Unplugged {
            return Err(ChargeError::ChargingWhileUnplugged {
                station: self.id.clone(),
                step,
                power_w,
            });
        }

        let before = self.state_of_charge;
        let mut soc = before + power * self.period_seconds;

        if soc.ceil() == 0.0 {
            soc = 0.0;
        }
        if soc > capacity_j && soc.floor() <= capacity_j {
            soc = capacity_j;
        }
        if soc.ceil() < 0.0 || soc > capacity_j {
            return Err(ChargeError::CapacityViolation {
                station: self.id.clone(),
                step,
                soc_j: soc,
                capacity_j,
            });
        }

        self.state_of_charge = soc;
        info!(
            station = %self.id,
            step,
            before_j = before,
            after_j = soc,
            "state of charge updated"
        );
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current stored energy (J).
    pub fn state_of_charge(&self) -> f64 {
        self.state_of_charge
    }

    pub fn limits(&self) -> DeviceLimits {
        self.limits
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn schedule(&self) -> &SessionSchedule {
        &self.schedule
    }

    pub fn period_seconds(&self) -> f64 {
        self.period_seconds
    }
}
