//! Runtime clock
//!
//! Run drivers sleep on the tokio timer, so "now" has to come from the same
//! source. [`RuntimeClock`] anchors a wall-clock instant to a tokio
//! [`Instant`] and advances with the runtime. Under a paused test runtime it
//! jumps forward together with auto-advanced timers.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

use core_kernel::Clock;

#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    origin_utc: DateTime<Utc>,
    origin: Instant,
}

impl RuntimeClock {
    /// Starts the clock at the current wall-clock time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Starts the clock at `origin_utc`
    pub fn starting_at(origin_utc: DateTime<Utc>) -> Self {
        Self {
            origin_utc,
            origin: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.origin.elapsed())
            .ok()
            .and_then(|elapsed| self.origin_utc.checked_add_signed(elapsed))
            .unwrap_or(self.origin_utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_follows_runtime_time() {
        let origin = Utc::now();
        let clock = RuntimeClock::starting_at(origin);

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(clock.now() - origin, TimeDelta::milliseconds(1_500));
    }
}
