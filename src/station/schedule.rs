use crate::error::ProfileError;

/// Per-station arrival/departure lookup for charging sessions.
///
/// Step indices are 0-based positions on the simulated timeline. The schedule
/// is immutable once built; arrival steps are strictly increasing and each
/// arrival carries the energy (J) the vehicle plugs in with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSchedule {
    arrival_steps: Vec<u64>,
    departure_steps: Vec<u64>,
    arrival_socs: Vec<f64>,
}

impl SessionSchedule {
    /// Creates a schedule for `station`.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if `arrival_steps` and `arrival_socs` differ in
    /// length, if `arrival_steps` is not strictly increasing, or if an arrival
    /// energy is negative or not finite.
    pub fn new(
        station: &str,
        arrival_steps: Vec<u64>,
        departure_steps: Vec<u64>,
        arrival_socs: Vec<f64>,
    ) -> Result<Self, ProfileError> {
        if arrival_steps.len() != arrival_socs.len() {
            return Err(ProfileError::invalid(
                station,
                "arrival_socs",
                format!(
                    "expected {} values to match arrival_ptus, got {}",
                    arrival_steps.len(),
                    arrival_socs.len()
                ),
            ));
        }
        if arrival_steps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ProfileError::invalid(
                station,
                "arrival_ptus",
                "must be strictly increasing",
            ));
        }
        if let Some(bad) = arrival_socs.iter().find(|e| !e.is_finite() || **e < 0.0) {
            return Err(ProfileError::invalid(
                station,
                "arrival_socs",
                format!("must be finite and >= 0, got {bad}"),
            ));
        }

        Ok(Self {
            arrival_steps,
            departure_steps,
            arrival_socs,
        })
    }

    /// Stored energy at simulation start.
    ///
    /// A vehicle arriving at step 0 starts plugged in with its arrival energy;
    /// otherwise the station starts empty.
    pub fn initial_state(&self) -> f64 {
        match (self.arrival_steps.first(), self.arrival_socs.first()) {
            (Some(0), Some(&soc)) => soc,
            _ => 0.0,
        }
    }

    /// Index of the session arriving at `step`, if any.
    pub fn session_at(&self, step: u64) -> Option<usize> {
        self.arrival_steps.iter().position(|&s| s == step)
    }

    /// Arrival energy of the session starting at `step`, if any.
    pub fn arrival_energy_at(&self, step: u64) -> Option<f64> {
        self.session_at(step).map(|i| self.arrival_socs[i])
    }

    /// Returns `true` when a vehicle leaves at `step`.
    pub fn departure_at(&self, step: u64) -> bool {
        self.departure_steps.contains(&step)
    }

    pub fn arrival_steps(&self) -> &[u64] {
        &self.arrival_steps
    }

    pub fn departure_steps(&self) -> &[u64] {
        &self.departure_steps
    }

    pub fn arrival_socs(&self) -> &[f64] {
        &self.arrival_socs
    }

    /// Number of sessions in the schedule.
    pub fn len(&self) -> usize {
        self.arrival_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrival_steps.is_empty()
    }
}
