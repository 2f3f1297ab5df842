//! Repository layer
//!
//! The poller talks to the remote job service only through [`JobRepository`].
//! The HTTP implementation is [`ResearchAgentClient`]; tests substitute
//! scripted implementations.

use async_trait::async_trait;
use folio_client::{ClientError, ResearchAgentClient};
use folio_core::dto::research::{
    ExecutionResponse, ReflectionResponse, ResultResponse, SessionStatus, StartChatResponse,
};

/// Repository trait for the remote job lifecycle
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Submits a job and returns its session id
    async fn submit(&self, query: &str) -> Result<StartChatResponse, ClientError>;

    /// Fetches the current status of a job
    async fn status(&self, session_id: &str) -> Result<SessionStatus, ClientError>;

    /// Fetches the final answer of a completed job
    async fn result(&self, session_id: &str) -> Result<ResultResponse, ClientError>;

    /// Fetches the self-reflection of a completed job
    async fn reflection(&self, session_id: &str) -> Result<ReflectionResponse, ClientError>;

    /// Fetches the execution trace of a completed job
    async fn execution(&self, session_id: &str) -> Result<ExecutionResponse, ClientError>;

    /// Where submissions go, for diagnostics
    fn endpoint(&self) -> &str;

    /// Whether submissions should be attempted at all
    fn is_connected(&self) -> bool {
        true
    }
}

#[async_trait]
impl JobRepository for ResearchAgentClient {
    async fn submit(&self, query: &str) -> Result<StartChatResponse, ClientError> {
        self.start_chat(query).await
    }

    async fn status(&self, session_id: &str) -> Result<SessionStatus, ClientError> {
        self.get_status(session_id).await
    }

    async fn result(&self, session_id: &str) -> Result<ResultResponse, ClientError> {
        self.get_result(session_id).await
    }

    async fn reflection(&self, session_id: &str) -> Result<ReflectionResponse, ClientError> {
        self.get_reflection(session_id).await
    }

    async fn execution(&self, session_id: &str) -> Result<ExecutionResponse, ClientError> {
        self.get_execution(session_id).await
    }

    fn endpoint(&self) -> &str {
        self.base_url()
    }

    fn is_connected(&self) -> bool {
        ResearchAgentClient::is_connected(self)
    }
}
