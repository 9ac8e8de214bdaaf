/// A simulation clock handing out 1-based step numbers.
///
/// Step `n` is the `n`-th interval of the run; the first call to
/// [`Clock::tick`] yields `1`.
///
/// # Examples
///
/// ```
/// use ev_station_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3);
/// let mut steps = Vec::new();
///
/// while let Some(step) = clock.tick() {
///     steps.push(step);
/// }
/// assert_eq!(steps, vec![1, 2, 3]);
/// ```
pub struct Clock {
    /// Steps already handed out
    elapsed: u64,
    /// Total steps to run in the simulation
    total: u64,
}

impl Clock {
    /// Creates a new clock with a specified total number of steps.
    pub fn new(total: u64) -> Self {
        Self { elapsed: 0, total }
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(step)` - The 1-based number of the step about to run
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<u64> {
        if self.elapsed < self.total {
            self.elapsed += 1;
            Some(self.elapsed)
        } else {
            None
        }
    }

    /// Runs a fallible function for each remaining step, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`; later steps are not run.
    pub fn try_run<E>(&mut self, mut f: impl FnMut(u64) -> Result<(), E>) -> Result<(), E> {
        while let Some(step) = self.tick() {
            f(step)?;
        }
        Ok(())
    }
}
