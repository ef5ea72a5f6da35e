//! Virtual deadlines for stepped animations

use std::time::{Duration, Instant};

/// How far a pacer may fall behind before it stops catching up
const MAX_LAG: Duration = Duration::from_millis(250);

/// Deadline of the next step of an animation
///
/// Delays accumulate from the previous deadline, not from the wake-up time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    due: Instant,
}

impl Pacer {
    /// Pacer whose first step is due at `start`
    pub fn new(start: Instant) -> Self {
        Self { due: start }
    }

    #[inline]
    pub fn due(&self) -> Instant {
        self.due
    }

    /// True if the next step should run at `now`
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        self.due <= now
    }

    /// Push the next step `delay` past the current deadline
    #[inline]
    pub fn delay(&mut self, delay: Duration) {
        self.due += delay;
    }

    /// Drop any backlog older than the catch-up window
    pub fn clamp_lag(&mut self, now: Instant) {
        if let Some(floor) = now.checked_sub(MAX_LAG) {
            if self.due < floor {
                self.due = floor;
            }
        }
    }
}
