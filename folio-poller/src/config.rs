//! Poller configuration
//!
//! Defines the polling schedule: the first inter-poll delay, how fast it
//! grows, where it stops growing, and an optional point at which the poller
//! stops waiting for a job altogether.

use std::time::Duration;

/// Default delay before the second poll
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Default cap on the inter-poll delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(5000);

/// Default growth factor applied after every poll
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.6;

/// Poller configuration
///
/// The same schedule applies to polls that report progress and to polls that
/// fail, so a flaky network never shortens or abandons a session.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Delay between the first and second poll
    pub initial_delay: Duration,

    /// Multiplier applied to the delay after each poll (result is floored to
    /// whole ms; above 1.0 the delay grows by at least 1 ms)
    pub backoff_factor: f64,

    /// Upper bound for the inter-poll delay
    pub max_delay: Duration,

    /// Stop polling and fail the session once this much time has passed.
    /// `None` polls until the job completes or the session is reset.
    pub give_up_after: Option<Duration>,
}

impl PollerConfig {
    /// Creates a configuration with the default schedule
    pub fn new() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
            give_up_after: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - FOLIO_POLL_INITIAL_MS (milliseconds, default: 1000)
    /// - FOLIO_POLL_MAX_MS (milliseconds, default: 5000)
    /// - FOLIO_POLL_FACTOR (default: 1.6)
    /// - FOLIO_POLL_GIVE_UP_SECS (seconds, default: unset)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::new();

        if let Some(raw) = lookup("FOLIO_POLL_INITIAL_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("FOLIO_POLL_INITIAL_MS is not a number: {}", e))?;
            config.initial_delay = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("FOLIO_POLL_MAX_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("FOLIO_POLL_MAX_MS is not a number: {}", e))?;
            config.max_delay = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("FOLIO_POLL_FACTOR") {
            config.backoff_factor = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| anyhow::anyhow!("FOLIO_POLL_FACTOR is not a number: {}", e))?;
        }

        if let Some(raw) = lookup("FOLIO_POLL_GIVE_UP_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("FOLIO_POLL_GIVE_UP_SECS is not a number: {}", e))?;
            config.give_up_after = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Sets the give-up deadline
    pub fn with_give_up_after(mut self, limit: Duration) -> Self {
        self.give_up_after = Some(limit);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.initial_delay.is_zero() {
            anyhow::bail!("initial_delay must be greater than 0");
        }

        if self.max_delay < self.initial_delay {
            anyhow::bail!("max_delay must not be smaller than initial_delay");
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            anyhow::bail!("backoff_factor must be a finite number >= 1.0");
        }

        if self.give_up_after.is_some_and(|limit| limit.is_zero()) {
            anyhow::bail!("give_up_after must be greater than 0 when set");
        }

        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new()
    }
}
