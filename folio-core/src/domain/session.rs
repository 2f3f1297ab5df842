//! Research session domain types
//!
//! A [`Session`] is the local mirror of one remote research job. It is owned
//! and mutated by the poller; everyone else reads snapshots of it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::research::{SessionStatus, StepResultEntry};

/// Local lifecycle of a session, tracked independently of the remote status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalStatus {
    #[default]
    Idle,
    Submitting,
    Polling,
    Done,
    Failed,
}

impl LocalStatus {
    /// A submission or polling loop is in flight
    pub fn is_active(&self) -> bool {
        matches!(self, LocalStatus::Submitting | LocalStatus::Polling)
    }

    /// Nothing more will happen until the next start or reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, LocalStatus::Done | LocalStatus::Failed)
    }
}

/// Status as reported by the remote job service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteStatus {
    Starting,
    Processing,
    Complete,
    Error,
    #[serde(other)]
    Unknown,
}

/// A partial result reported by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: i64,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl StepResult {
    /// Converts a wire entry, stamping it with `observed_at` when the
    /// reported timestamp cannot be parsed.
    pub fn from_entry(entry: &StepResultEntry, observed_at: DateTime<Utc>) -> Self {
        Self {
            step: entry.step,
            result: entry.result.clone(),
            timestamp: parse_timestamp(&entry.timestamp).unwrap_or(observed_at),
        }
    }
}

/// Parses RFC 3339, falling back to naive ISO-8601 read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Terminal artifacts fetched once a job completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    FinalResponse,
    Reflection,
    ExecutionHistory,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::FinalResponse => write!(f, "final response"),
            ArtifactKind::Reflection => write!(f, "reflection"),
            ArtifactKind::ExecutionHistory => write!(f, "execution history"),
        }
    }
}

/// Record of a terminal artifact that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFailure {
    pub artifact: ArtifactKind,
    pub message: String,
}

/// Local mirror of one remote research job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Fresh for every start; a loop only mutates the session carrying its id
    pub attempt_id: Option<Uuid>,
    /// Assigned by the remote service, never changed afterwards
    pub session_id: Option<String>,
    pub status: LocalStatus,
    pub remote_status: Option<RemoteStatus>,
    pub activity: String,
    pub confidence: f64,
    pub plan_steps: Vec<String>,
    pub current_step: usize,
    /// Append-only
    pub step_results: Vec<StepResult>,
    pub final_response: Option<String>,
    pub reflection: Option<String>,
    pub execution_history: Option<Vec<String>>,
    pub artifact_failures: Vec<ArtifactFailure>,
    /// Last fatal failure; poll failures never land here
    pub error: Option<String>,
    pub polls: u32,
    pub failed_polls: u32,
    pub last_poll_error: Option<String>,
}

impl Session {
    /// A new session about to be submitted
    pub fn begin(attempt_id: Uuid) -> Self {
        Self {
            attempt_id: Some(attempt_id),
            status: LocalStatus::Submitting,
            ..Default::default()
        }
    }

    /// Whether this session belongs to the given attempt
    pub fn is_attempt(&self, attempt_id: Uuid) -> bool {
        self.attempt_id == Some(attempt_id)
    }

    /// Records the remote identifier and moves to polling
    ///
    /// Returns false and leaves the session untouched if an identifier was
    /// already assigned.
    pub fn mark_submitted(&mut self, session_id: impl Into<String>) -> bool {
        if self.session_id.is_some() {
            return false;
        }
        self.session_id = Some(session_id.into());
        self.status = LocalStatus::Polling;
        true
    }

    /// Fatal failure of this attempt
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = LocalStatus::Failed;
        self.error = Some(message.into());
    }

    /// Merges a successful status report
    ///
    /// Step results are appended in arrival order. An entry is skipped only
    /// when one with the same step and text is already held, so re-sent
    /// entries are not duplicated and entries the service stops reporting are
    /// kept.
    pub fn apply_status(&mut self, report: &SessionStatus, observed_at: DateTime<Utc>) {
        self.polls += 1;
        self.remote_status = Some(report.status);
        self.activity = report.activity.clone();
        self.confidence = report.confidence;
        if !report.plan_steps.is_empty() {
            self.plan_steps = report.plan_steps.clone();
        }
        self.current_step = usize::try_from(report.current_step).unwrap_or(0);

        for entry in &report.step_results {
            if self
                .step_results
                .iter()
                .any(|r| r.step == entry.step && r.result == entry.result)
            {
                continue;
            }
            self.step_results.push(StepResult::from_entry(entry, observed_at));
        }
    }

    /// Records a poll that failed and will be retried
    pub fn record_poll_failure(&mut self, message: impl Into<String>) {
        self.polls += 1;
        self.failed_polls += 1;
        self.last_poll_error = Some(message.into());
    }

    /// The plan step currently being worked on, if the plan is known
    pub fn current_plan_step(&self) -> Option<&str> {
        self.plan_steps.get(self.current_step).map(String::as_str)
    }
}
