//! Folio HTTP Clients
//!
//! Typed HTTP clients for the two demo backends Folio fronts: the research
//! agent (long-running jobs polled by session id) and the shopping chatbot.
//!
//! Both clients are explicitly constructed with their base URL and, when
//! timeouts or proxies matter, a pre-configured [`reqwest::Client`].
//!
//! # Example
//!
//! ```no_run
//! use folio_client::ResearchAgentClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ResearchAgentClient::new("https://agent.example.org/api");
//!
//!     let started = client.start_chat("Summarize AI news").await?;
//!     let status = client.get_status(&started.session_id).await?;
//!
//!     println!("{}: {}", status.session_id, status.activity);
//!     Ok(())
//! }
//! ```

mod chatbot;
pub mod endpoint;
pub mod error;
mod research;

// Re-export commonly used types
pub use chatbot::{CHATBOT_URL_ENV, ChatbotClient, DEFAULT_CHATBOT_URL};
pub use error::{ClientError, Result};
pub use research::{DEFAULT_RESEARCH_AGENT_URL, RESEARCH_AGENT_URL_ENV, ResearchAgentClient};

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Shared request plumbing for the service clients
#[derive(Debug, Clone)]
struct Transport {
    /// Base URL without a trailing slash
    base_url: String,
    client: Client,
}

impl Transport {
    fn new(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Every request declares a JSON body, including GETs
    fn get(&self, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        self.client
            .get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        self.client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Sends a request and deserializes the JSON body
    ///
    /// Any non-success status is an error regardless of the body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_trims_base_url() {
        let transport = Transport::new(" http://api.test/ ", Client::new());
        assert_eq!(transport.base_url, "http://api.test");
        assert_eq!(transport.url("/status/abc"), "http://api.test/status/abc");
    }
}
