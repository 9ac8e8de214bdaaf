use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::station::profile::StationProfile;

/// Synthetic session generator for stations without recorded profiles.
///
/// Each simulated day gets one session with:
/// - random dwell duration in `[dwell_steps_min, dwell_steps_max]`
/// - random arrival step such that the vehicle leaves before the day ends
/// - random arrival energy as a fraction of capacity
#[derive(Debug, Clone)]
pub struct SessionGenerator {
    /// Number of simulation steps per day.
    steps_per_day: u64,

    /// Battery capacity (J).
    pub capacity_j: f64,

    /// Minimum connected duration in simulation steps.
    pub dwell_steps_min: u64,

    /// Maximum connected duration in simulation steps.
    pub dwell_steps_max: u64,

    /// Minimum arrival energy as a fraction of capacity.
    pub arrival_fraction_min: f64,

    /// Maximum arrival energy as a fraction of capacity.
    pub arrival_fraction_max: f64,

    rng: StdRng,
}

impl SessionGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `steps_per_day` - Steps in one simulated day (must be > 0)
    /// * `capacity_j` - Battery capacity in J (must be > 0)
    /// * `dwell_steps_min` - Minimum connected duration in steps (must be > 0)
    /// * `dwell_steps_max` - Maximum connected duration in steps
    /// * `arrival_fraction_min` - Minimum arrival energy fraction (0.0 to 1.0)
    /// * `arrival_fraction_max` - Maximum arrival energy fraction (0.0 to 1.0)
    /// * `seed` - Random seed for reproducible sessions
    ///
    /// # Panics
    ///
    /// Panics if any range is empty or out of bounds.
    pub fn new(
        steps_per_day: u64,
        capacity_j: f64,
        dwell_steps_min: u64,
        dwell_steps_max: u64,
        arrival_fraction_min: f64,
        arrival_fraction_max: f64,
        seed: u64,
    ) -> Self {
        assert!(steps_per_day > 0);
        assert!(capacity_j > 0.0);
        assert!(dwell_steps_min > 0);
        assert!(dwell_steps_max >= dwell_steps_min);
        assert!((0.0..=1.0).contains(&arrival_fraction_min));
        assert!((arrival_fraction_min..=1.0).contains(&arrival_fraction_max));

        Self {
            steps_per_day,
            capacity_j,
            dwell_steps_min,
            dwell_steps_max,
            arrival_fraction_min,
            arrival_fraction_max,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Samples a profile covering `days` simulated days.
    pub fn profile(&mut self, days: u64) -> StationProfile {
        let mut arrival_ptus = Vec::with_capacity(days as usize);
        let mut departure_ptus = Vec::with_capacity(days as usize);
        let mut arrival_socs = Vec::with_capacity(days as usize);

        let dwell_max = self.dwell_steps_max.min(self.steps_per_day);
        let dwell_min = self.dwell_steps_min.min(dwell_max);

        for day in 0..days {
            let dwell = self.rng.random_range(dwell_min..=dwell_max);
            let latest_arrival = self.steps_per_day - dwell;
            let arrival = day * self.steps_per_day + self.rng.random_range(0..=latest_arrival);
            let fraction = self
                .rng
                .random_range(self.arrival_fraction_min..=self.arrival_fraction_max);

            arrival_ptus.push(arrival);
            departure_ptus.push(arrival + dwell);
            arrival_socs.push(fraction * self.capacity_j);
        }

        StationProfile {
            arrival_ptus,
            departure_ptus,
            arrival_socs,
            max_soc: self.capacity_j,
            efficiency: 1.0,
        }
    }
}
