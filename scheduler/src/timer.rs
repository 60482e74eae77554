use crate::clock::Clock;
use std::time::Duration;

/// Drift-corrected fixed-rate timing.
///
/// Keeps the ideal elapsed time (one interval per tick) next to the wall
/// clock elapsed since `start`, and shortens or lengthens each delay by the
/// difference so late ticks do not accumulate.
#[derive(Debug, Clone)]
pub struct RateTimer {
    interval: Duration,
    started_at: Duration,
    ideal: Duration,
}

impl RateTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            started_at: Duration::ZERO,
            ideal: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Takes effect from the next call to `next_delay`.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Record the start time and reset the ideal elapsed time.
    pub fn start(&mut self, clock: &dyn Clock) {
        self.started_at = clock.now();
        self.ideal = Duration::ZERO;
    }

    /// Delay until the next tick, called once a tick has finished.
    ///
    /// `delay = interval - ((now - start) - ideal)`, floored at zero.
    pub fn next_delay(&mut self, clock: &dyn Clock) -> Duration {
        self.ideal += self.interval;
        let elapsed = clock.now().saturating_sub(self.started_at);
        (self.ideal + self.interval).saturating_sub(elapsed)
    }
}
