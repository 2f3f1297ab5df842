//! Capped multiplicative backoff

use std::time::Duration;

use crate::config::PollerConfig;

/// Inter-poll delay schedule
///
/// Yields the initial delay first, then grows it by the factor (floored to
/// whole milliseconds, and by at least 1 ms) until it reaches the cap. With
/// the defaults that is 1000, 1600, 2560, 4096, 5000, 5000, ... ms.
#[derive(Debug, Clone)]
pub struct Backoff {
    current_ms: u64,
    factor: f64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(initial: Duration, factor: f64, max: Duration) -> Self {
        let max_ms = duration_ms(max);
        Self {
            current_ms: duration_ms(initial).min(max_ms),
            factor,
            max_ms,
        }
    }

    pub fn from_config(config: &PollerConfig) -> Self {
        Self::new(config.initial_delay, config.backoff_factor, config.max_delay)
    }

    /// Returns the current delay and advances the schedule
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current_ms;
        // Saturating float-to-int cast keeps huge factors at the cap
        let grown = (delay as f64 * self.factor).floor() as u64;
        let grown = if self.factor > 1.0 {
            grown.max(delay.saturating_add(1))
        } else {
            grown
        };
        self.current_ms = grown.min(self.max_ms);
        Duration::from_millis(delay)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
