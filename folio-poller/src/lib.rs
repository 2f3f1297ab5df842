//! Folio Session Poller
//!
//! Drives one research job on the remote agent from submission to its
//! terminal state and exposes the mirrored [`Session`] to whoever renders it.
//!
//! Architecture:
//! - Configuration: backoff policy, loaded from environment or defaults
//! - Repository: the remote job API behind a trait, so the loop can be tested
//!   without HTTP
//! - Scheduler: the backoff schedule, the pure polling state machine, and the
//!   cancellable task that runs it
//!
//! Only submission failures reach the caller. Poll failures are retried on
//! the normal backoff schedule and terminal artifact failures are recorded
//! per artifact on the session.
//!
//! [`Session`]: folio_core::domain::session::Session

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;

pub use config::PollerConfig;
pub use error::{ArtifactFetchError, PollError, SubmissionError};
pub use repository::JobRepository;
pub use scheduler::{Backoff, SessionPoller};
