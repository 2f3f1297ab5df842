//! Scripted in-process job repository for poller tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio_client::ClientError;
use folio_core::domain::session::{ArtifactKind, RemoteStatus, Session};
use folio_core::dto::research::{
    ExecutionResponse, ReflectionResponse, ResultResponse, SessionStatus, StartChatResponse,
    StepResultEntry,
};
use folio_poller::JobRepository;
use tokio::sync::{Notify, watch};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Submit,
    Status,
    Result,
    Reflection,
    Execution,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub kind: CallKind,
    /// Query for submissions, session id otherwise
    pub arg: String,
    /// Time since the repository was created
    pub at: Duration,
}

pub enum SubmitReply {
    Accept,
    Reject(u16),
    EmptyId,
    /// Never answers
    Hang,
}

pub enum StatusReply {
    Report(SessionStatus),
    Fail(u16),
    Network,
    /// Blocks until [`ScriptedRepository::release`] is called
    Gated(SessionStatus),
}

pub fn processing(activity: &str) -> StatusReply {
    StatusReply::Report(report(RemoteStatus::Processing, activity, false))
}

pub fn complete() -> StatusReply {
    StatusReply::Report(report(RemoteStatus::Complete, "Done", true))
}

pub fn report(status: RemoteStatus, activity: &str, complete: bool) -> SessionStatus {
    SessionStatus {
        session_id: String::new(),
        status,
        activity: activity.to_string(),
        confidence: 0.5,
        complete,
        plan_steps: vec!["search".to_string(), "summarize".to_string()],
        current_step: 0,
        step_results: vec![StepResultEntry {
            step: 0,
            result: "collected sources".to_string(),
            timestamp: "2025-03-01T12:00:00Z".to_string(),
        }],
    }
}

fn network_error() -> ClientError {
    ClientError::InvalidRequest("connection refused".to_string())
}

/// Repository that replays scripted replies and records every call
///
/// Once the status script runs out, every further poll reports `Processing`.
pub struct ScriptedRepository {
    origin: Instant,
    connected: bool,
    submit_replies: Mutex<VecDeque<SubmitReply>>,
    status_replies: Mutex<VecDeque<StatusReply>>,
    failing_artifacts: Vec<ArtifactKind>,
    gated_result: bool,
    gate: Notify,
    result_gate: Notify,
    calls: Mutex<Vec<Call>>,
    sessions: AtomicUsize,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            connected: true,
            submit_replies: Mutex::new(VecDeque::new()),
            status_replies: Mutex::new(VecDeque::new()),
            failing_artifacts: Vec::new(),
            gated_result: false,
            gate: Notify::new(),
            result_gate: Notify::new(),
            calls: Mutex::new(Vec::new()),
            sessions: AtomicUsize::new(0),
        }
    }

    pub fn with_statuses(self, replies: Vec<StatusReply>) -> Self {
        *self.status_replies.lock().unwrap() = replies.into();
        self
    }

    pub fn with_submit(self, reply: SubmitReply) -> Self {
        self.submit_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn failing_artifact(mut self, kind: ArtifactKind) -> Self {
        self.failing_artifacts.push(kind);
        self
    }

    /// Holds the final response request until [`Self::release_result`]
    pub fn gating_result(mut self) -> Self {
        self.gated_result = true;
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// Lets a gated status reply through
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn release_result(&self) {
        self.result_gate.notify_one();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }

    /// Milliseconds since creation at which each status poll was issued
    pub fn status_times_ms(&self) -> Vec<u128> {
        self.calls()
            .iter()
            .filter(|c| c.kind == CallKind::Status)
            .map(|c| c.at.as_millis())
            .collect()
    }

    fn record(&self, kind: CallKind, arg: &str) {
        self.calls.lock().unwrap().push(Call {
            kind,
            arg: arg.to_string(),
            at: Instant::now().duration_since(self.origin),
        });
    }

    fn artifact(&self, kind: ArtifactKind) -> Result<(), ClientError> {
        if self.failing_artifacts.contains(&kind) {
            Err(ClientError::api_error(500, format!("{} unavailable", kind)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JobRepository for ScriptedRepository {
    async fn submit(&self, query: &str) -> Result<StartChatResponse, ClientError> {
        self.record(CallKind::Submit, query);

        let reply = self
            .submit_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SubmitReply::Accept);

        match reply {
            SubmitReply::Accept => {
                let n = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(StartChatResponse {
                    session_id: format!("session-{}", n),
                    status: "Starting".to_string(),
                })
            }
            SubmitReply::Reject(status) => Err(ClientError::api_error(status, "rejected")),
            SubmitReply::EmptyId => Ok(StartChatResponse {
                session_id: String::new(),
                status: "Starting".to_string(),
            }),
            SubmitReply::Hang => std::future::pending().await,
        }
    }

    async fn status(&self, session_id: &str) -> Result<SessionStatus, ClientError> {
        self.record(CallKind::Status, session_id);

        let reply = self
            .status_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| processing("Researching"));

        let mut status = match reply {
            StatusReply::Report(status) => status,
            StatusReply::Fail(code) => return Err(ClientError::api_error(code, "status failed")),
            StatusReply::Network => return Err(network_error()),
            StatusReply::Gated(status) => {
                self.gate.notified().await;
                status
            }
        };
        status.session_id = session_id.to_string();
        Ok(status)
    }

    async fn result(&self, session_id: &str) -> Result<ResultResponse, ClientError> {
        self.record(CallKind::Result, session_id);
        if self.gated_result {
            self.result_gate.notified().await;
        }
        self.artifact(ArtifactKind::FinalResponse)?;
        Ok(ResultResponse {
            session_id: session_id.to_string(),
            response: format!("final answer for {}", session_id),
            complete: true,
        })
    }

    async fn reflection(&self, session_id: &str) -> Result<ReflectionResponse, ClientError> {
        self.record(CallKind::Reflection, session_id);
        self.artifact(ArtifactKind::Reflection)?;
        Ok(ReflectionResponse {
            session_id: session_id.to_string(),
            reflection: "the sources agreed".to_string(),
            complete: true,
        })
    }

    async fn execution(&self, session_id: &str) -> Result<ExecutionResponse, ClientError> {
        self.record(CallKind::Execution, session_id);
        self.artifact(ArtifactKind::ExecutionHistory)?;
        Ok(ExecutionResponse {
            session_id: session_id.to_string(),
            execution_history: vec!["plan".to_string(), "search".to_string()],
            step_count: 2,
        })
    }

    fn endpoint(&self) -> &str {
        if self.connected {
            "https://agent.test/api"
        } else {
            "https://your-agent.test/api"
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Waits until the published session satisfies `predicate`
pub async fn wait_until(rx: &mut watch::Receiver<Session>, predicate: impl FnMut(&Session) -> bool) {
    rx.wait_for(predicate)
        .await
        .map(|_| ())
        .expect("poller dropped its state channel");
}

/// Lets the paused clock run forward with nothing scheduled but the poller
pub async fn idle_for(duration: Duration) {
    tokio::time::sleep(duration).await;
}
