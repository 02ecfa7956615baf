//! Minimum-interval pacing for outbound requests.
//!
//! The server enforces a global request rate, so every fetch and every move
//! submit goes through a [`Cadence`] that spaces calls at least
//! `min_interval` apart. The delay math is pure so it can be tested with
//! synthetic instants.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Cadence {
    min_interval: Duration,
    last: Option<Instant>,
}

impl Cadence {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// How long a call issued at `now` must wait to honor the interval.
    pub fn delay_from(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                self.min_interval.saturating_sub(elapsed)
            }
        }
    }

    /// Records that a call was issued at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Sleeps out the remaining interval, then marks the call.
    pub async fn pace(&mut self) {
        let delay = self.delay_from(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.mark(Instant::now());
    }
}
