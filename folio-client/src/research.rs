//! Research agent API endpoints

use folio_core::dto::research::{
    ClearMemoryResponse, ExecutionResponse, HealthResponse, KeyStatus, MemorySummary,
    ReflectionResponse, ResultResponse, SessionStatus, StartChatRequest, StartChatResponse,
};
use reqwest::Client;

use crate::Transport;
use crate::endpoint;
use crate::error::{ClientError, Result};

/// Deployment used when neither a flag nor the environment names one
pub const DEFAULT_RESEARCH_AGENT_URL: &str =
    "https://subjective-martha-researchagent-ebdaf861.koyeb.app/api";

/// Environment variable consulted by [`ResearchAgentClient::from_env_or`]
pub const RESEARCH_AGENT_URL_ENV: &str = "FOLIO_RESEARCH_AGENT_URL";

/// HTTP client for the research agent API
///
/// The agent runs each query as a background job identified by a session id:
/// - Job lifecycle (start, status, result, reflection, execution trace)
/// - Agent maintenance (health, memory, API key usage)
#[derive(Debug, Clone)]
pub struct ResearchAgentClient {
    transport: Transport,
}

impl ResearchAgentClient {
    /// Create a new research agent client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the agent API, including any path prefix
    ///
    /// # Example
    /// ```
    /// use folio_client::ResearchAgentClient;
    ///
    /// let client = ResearchAgentClient::new("https://agent.koyeb.app/api/");
    /// assert_eq!(client.base_url(), "https://agent.koyeb.app/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            transport: Transport::new(base_url, client),
        }
    }

    /// Create a client for `explicit`, falling back to `FOLIO_RESEARCH_AGENT_URL`
    /// and then to [`DEFAULT_RESEARCH_AGENT_URL`]
    pub fn from_env_or(explicit: Option<&str>, client: Client) -> Self {
        let base_url = endpoint::resolve_base_url(
            explicit,
            RESEARCH_AGENT_URL_ENV,
            DEFAULT_RESEARCH_AGENT_URL,
        );
        Self::with_client(base_url, client)
    }

    /// Get the base URL of the agent
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// Whether the configured URL looks like a real deployment
    pub fn is_connected(&self) -> bool {
        endpoint::is_connected(self.base_url())
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a research query
    ///
    /// # Arguments
    /// * `query` - The research question, sent as-is
    ///
    /// # Returns
    /// The session id assigned to the new job
    pub async fn start_chat(&self, query: &str) -> Result<StartChatResponse> {
        let request = self.transport.post("/chat").json(&StartChatRequest {
            query: query.to_string(),
        });

        self.transport.send(request).await
    }

    /// Get the current status of a job
    ///
    /// # Arguments
    /// * `session_id` - The session id returned by [`Self::start_chat`]
    pub async fn get_status(&self, session_id: &str) -> Result<SessionStatus> {
        let request = self.transport.get(&session_path("status", session_id)?);
        self.transport.send(request).await
    }

    /// Get the final answer of a completed job
    pub async fn get_result(&self, session_id: &str) -> Result<ResultResponse> {
        let request = self.transport.get(&session_path("result", session_id)?);
        self.transport.send(request).await
    }

    /// Get the agent's self-reflection for a completed job
    pub async fn get_reflection(&self, session_id: &str) -> Result<ReflectionResponse> {
        let request = self.transport.get(&session_path("reflection", session_id)?);
        self.transport.send(request).await
    }

    /// Get the execution trace of a completed job
    pub async fn get_execution(&self, session_id: &str) -> Result<ExecutionResponse> {
        let request = self.transport.get(&session_path("execution", session_id)?);
        self.transport.send(request).await
    }

    // =============================================================================
    // Agent Maintenance
    // =============================================================================

    /// Check whether the agent is up
    pub async fn health_check(&self) -> Result<HealthResponse> {
        let request = self.transport.get("/health");
        self.transport.send(request).await
    }

    /// Summary of the agent's long-term memory
    pub async fn get_memory_summary(&self) -> Result<MemorySummary> {
        let request = self.transport.get("/memory/summary");
        self.transport.send(request).await
    }

    /// Wipe the agent's long-term memory
    pub async fn clear_memory(&self) -> Result<ClearMemoryResponse> {
        let request = self.transport.post("/memory/clear");
        self.transport.send(request).await
    }

    /// Usage of the agent's upstream API keys
    pub async fn get_key_status(&self) -> Result<KeyStatus> {
        let request = self.transport.get("/keys/status");
        self.transport.send(request).await
    }
}

/// Path of a per-session resource; a blank id would address the collection
fn session_path(resource: &str, session_id: &str) -> Result<String> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "{} requested without a session id",
            resource
        )));
    }
    Ok(format!("/{}/{}", resource, session_id))
}
