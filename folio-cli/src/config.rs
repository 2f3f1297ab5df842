//! Configuration module
//!
//! Handles CLI configuration: service endpoints, HTTP timeout and the
//! polling schedule.

use std::time::Duration;

use anyhow::{Context, Result};
use folio_client::{ChatbotClient, ResearchAgentClient};
use folio_poller::PollerConfig;
use reqwest::Client;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Research agent base URL; environment and built-in default apply when `None`
    pub research_url: Option<String>,

    /// Chatbot base URL; environment and built-in default apply when `None`
    pub chatbot_url: Option<String>,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,

    /// Polling schedule for `research run`
    pub poller: PollerConfig,
}

impl Config {
    /// Builds the configuration from parsed flags plus `FOLIO_POLL_*` variables
    pub fn new(
        research_url: Option<String>,
        chatbot_url: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let poller = PollerConfig::from_env().context("Invalid polling configuration")?;

        let config = Self {
            research_url,
            chatbot_url,
            http_timeout: Duration::from_secs(timeout_secs),
            poller,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0 seconds");
        }

        self.poller.validate().context("Invalid polling configuration")
    }

    fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.http_timeout)
            .build()
            .context("Failed to build HTTP client")
    }

    /// Research agent client for the configured endpoint
    pub fn research_client(&self) -> Result<ResearchAgentClient> {
        Ok(ResearchAgentClient::from_env_or(
            self.research_url.as_deref(),
            self.http_client()?,
        ))
    }

    /// Chatbot client for the configured endpoint
    pub fn chatbot_client(&self) -> Result<ChatbotClient> {
        Ok(ChatbotClient::from_env_or(
            self.chatbot_url.as_deref(),
            self.http_client()?,
        ))
    }
}
