//! Session poller
//!
//! Submits a research query, then polls the job on its own task until the
//! job completes, the poller is reset, or a new session is started.
//! The session is published through a watch channel; the task only mutates
//! it while the session still carries the task's attempt id.

use std::sync::Arc;

use chrono::Utc;
use folio_core::domain::session::{LocalStatus, Session};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PollerConfig;
use crate::error::{PollError, SubmissionError};
use crate::repository::JobRepository;
use crate::scheduler::artifacts::TerminalArtifacts;
use crate::scheduler::machine::{PollMachine, Tick};

/// Polling loop currently owned by the poller
struct ActiveLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives one remote research job at a time
///
/// Starting a new session or resetting cancels the previous loop before
/// anything else happens, so at most one loop is ever alive per poller.
pub struct SessionPoller<R: JobRepository + 'static> {
    repository: Arc<R>,
    config: PollerConfig,
    state: Arc<watch::Sender<Session>>,
    active: Option<ActiveLoop>,
}

impl<R: JobRepository + 'static> SessionPoller<R> {
    /// Creates an idle poller
    pub fn new(repository: Arc<R>, config: PollerConfig) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            repository,
            config,
            state: Arc::new(state),
            active: None,
        }
    }

    /// Receiver that observes every published session update
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Whether a polling loop is still running
    pub fn is_polling(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Submits `input` and starts polling the new job
    ///
    /// Blank input and a disconnected endpoint are rejected without touching
    /// the current session. Otherwise any previous session is cancelled and
    /// discarded first.
    ///
    /// Cancel-safe: dropping the returned future while the submission is in
    /// flight leaves the poller idle, as after [`Self::reset`].
    ///
    /// # Returns
    /// The session id assigned by the remote service
    pub async fn start(&mut self, input: &str) -> Result<String, SubmissionError> {
        let query = input.trim();
        if query.is_empty() {
            debug!("Ignoring empty query");
            return Err(SubmissionError::EmptyInput);
        }

        if !self.repository.is_connected() {
            return Err(SubmissionError::NotConnected {
                url: self.repository.endpoint().to_string(),
            });
        }

        self.cancel_active();

        let attempt_id = Uuid::new_v4();
        self.state.send_replace(Session::begin(attempt_id));
        let mut pending = PendingSubmission {
            state: Arc::clone(&self.state),
            attempt_id,
            armed: true,
        };

        info!("Submitting research query ({} chars)", query.len());

        let submitted = self
            .repository
            .submit(query)
            .await
            .map_err(SubmissionError::from)
            .and_then(|response| {
                if response.session_id.trim().is_empty() {
                    Err(SubmissionError::InvalidResponse(
                        "response carried an empty session_id".to_string(),
                    ))
                } else {
                    Ok(response.session_id)
                }
            });

        pending.armed = false;

        match submitted {
            Ok(session_id) => {
                self.state.send_if_modified(|session| {
                    session.is_attempt(attempt_id) && session.mark_submitted(session_id.clone())
                });
                info!("Session {} started, polling", session_id);

                self.active = Some(self.spawn_loop(attempt_id, session_id.clone()));
                Ok(session_id)
            }
            Err(err) => {
                warn!("Failed to start session: {}", err);
                let message = err.to_string();
                self.state.send_if_modified(|session| {
                    if !session.is_attempt(attempt_id) {
                        return false;
                    }
                    session.mark_failed(message);
                    true
                });
                Err(err)
            }
        }
    }

    /// Cancels any running loop and discards the session
    pub fn reset(&mut self) {
        self.cancel_active();
        self.state.send_replace(Session::default());
        debug!("Poller reset");
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.handle.abort();
        }
    }

    fn spawn_loop(&self, attempt_id: Uuid, session_id: String) -> ActiveLoop {
        let cancel = CancellationToken::new();
        let task = PollTask {
            repository: Arc::clone(&self.repository),
            state: Arc::clone(&self.state),
            cancel: cancel.clone(),
            attempt_id,
            session_id,
            machine: PollMachine::new(&self.config, Instant::now()),
        };

        ActiveLoop {
            cancel,
            handle: tokio::spawn(task.run()),
        }
    }
}

impl<R: JobRepository + 'static> Drop for SessionPoller<R> {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// Resets a session still in `Submitting` if `start` is dropped mid-request
struct PendingSubmission {
    state: Arc<watch::Sender<Session>>,
    attempt_id: Uuid,
    armed: bool,
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let attempt_id = self.attempt_id;
        let abandoned = self.state.send_if_modified(|session| {
            if !session.is_attempt(attempt_id) || session.status != LocalStatus::Submitting {
                return false;
            }
            *session = Session::default();
            true
        });

        if abandoned {
            debug!("Submission abandoned, poller reset");
        }
    }
}

/// State moved into the spawned polling task
struct PollTask<R: JobRepository + 'static> {
    repository: Arc<R>,
    state: Arc<watch::Sender<Session>>,
    cancel: CancellationToken,
    attempt_id: Uuid,
    session_id: String,
    machine: PollMachine,
}

impl<R: JobRepository + 'static> PollTask<R> {
    async fn run(mut self) {
        loop {
            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => return,
                outcome = self.repository.status(&self.session_id) => outcome.map_err(PollError::from),
            };

            if let Err(e) = &outcome {
                debug!("Poll of session {} failed, retrying: {}", self.session_id, e);
            }

            let Some(tick) = self.apply(|machine, session| {
                machine.on_poll(session, outcome, Instant::now(), Utc::now())
            }) else {
                return;
            };

            match tick {
                Tick::Wait(delay) => {
                    debug!("Session {} next poll in {:?}", self.session_id, delay);
                    tokio::select! {
                        _ = self.cancel.cancelled() => return,
                        _ = time::sleep(delay) => {}
                    }
                }
                Tick::Complete => {
                    info!("Session {} complete, fetching results", self.session_id);
                    self.finish().await;
                    return;
                }
                Tick::GaveUp => {
                    warn!("Gave up polling session {}", self.session_id);
                    return;
                }
            }
        }
    }

    async fn finish(&mut self) {
        let artifacts = tokio::select! {
            _ = self.cancel.cancelled() => return,
            artifacts = TerminalArtifacts::fetch(self.repository.as_ref(), &self.session_id) => artifacts,
        };

        for failure in artifacts.failures() {
            warn!("Session {}: {}", self.session_id, failure);
        }

        self.apply(|machine, session| machine.on_artifacts(session, &artifacts));
    }

    /// Runs `f` against the published session if it still belongs to this task
    ///
    /// Returns `None` when the session was reset or replaced, in which case
    /// nothing is mutated and the task should stop.
    fn apply<T>(&mut self, f: impl FnOnce(&mut PollMachine, &mut Session) -> T) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let attempt_id = self.attempt_id;
        let machine = &mut self.machine;
        let mut output = None;

        self.state.send_if_modified(|session| {
            if !session.is_attempt(attempt_id) || session.status != LocalStatus::Polling {
                return false;
            }
            output = Some(f(machine, session));
            true
        });

        output
    }
}
