use std::time::{Duration, Instant};

/// Wall-clock deadline that fires at most once per check.
///
/// A caller that falls more than one period behind gets a single tick and
/// the deadline is moved forward from `now`; missed ticks are not replayed.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next: start + period,
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}
