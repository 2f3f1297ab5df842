//! Polling state machine
//!
//! Pure transition logic: given the outcome of a poll, update the session
//! and decide what the driver does next. No I/O and no clock reads happen
//! here, which keeps every transition unit-testable.

use std::time::Duration;

use chrono::{DateTime, Utc};
use folio_core::domain::session::{LocalStatus, Session};
use folio_core::dto::research::SessionStatus;
use tokio::time::Instant;

use crate::config::PollerConfig;
use crate::error::PollError;
use crate::scheduler::artifacts::TerminalArtifacts;
use crate::scheduler::backoff::Backoff;

/// What the driver does after a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Sleep, then poll again
    Wait(Duration),
    /// The job finished; fetch terminal artifacts and stop polling
    Complete,
    /// The give-up deadline passed; the session is now failed
    GaveUp,
}

/// Per-session polling state
#[derive(Debug, Clone)]
pub struct PollMachine {
    backoff: Backoff,
    started: Instant,
    give_up_after: Option<Duration>,
}

impl PollMachine {
    /// Creates the machine for a session whose polling began at `started`
    pub fn new(config: &PollerConfig, started: Instant) -> Self {
        Self {
            backoff: Backoff::from_config(config),
            started,
            give_up_after: config.give_up_after,
        }
    }

    /// Applies one poll outcome to the session
    ///
    /// A failed poll is retried on exactly the schedule of a successful but
    /// incomplete one.
    pub fn on_poll(
        &mut self,
        session: &mut Session,
        outcome: Result<SessionStatus, PollError>,
        now: Instant,
        observed_at: DateTime<Utc>,
    ) -> Tick {
        match outcome {
            Ok(report) => {
                session.apply_status(&report, observed_at);
                if report.reports_completion() {
                    return Tick::Complete;
                }
            }
            Err(err) => session.record_poll_failure(err.to_string()),
        }

        if let Some(limit) = self.give_up_after {
            if now.saturating_duration_since(self.started) >= limit {
                session.mark_failed(format!(
                    "Gave up after {}s without the job completing",
                    limit.as_secs()
                ));
                return Tick::GaveUp;
            }
        }

        Tick::Wait(self.backoff.next_delay())
    }

    /// Applies the settled terminal fetch; the session is done either way
    pub fn on_artifacts(&mut self, session: &mut Session, artifacts: &TerminalArtifacts) {
        artifacts.apply_to(session);
        session.status = LocalStatus::Done;
    }
}
