//! Shopping chatbot API endpoints

use folio_core::dto::chatbot::{
    ChatMessage, ChatResponse, HealthCheckResponse, Product, ProductSearchParams, ProductsEnvelope,
    ProductsParams,
};
use reqwest::Client;

use crate::Transport;
use crate::endpoint;
use crate::error::Result;

/// Deployment used when neither a flag nor the environment names one
pub const DEFAULT_CHATBOT_URL: &str = "http://52.91.104.111";

/// Environment variable consulted by [`ChatbotClient::from_env_or`]
pub const CHATBOT_URL_ENV: &str = "FOLIO_CHATBOT_URL";

/// HTTP client for the shopping chatbot API
#[derive(Debug, Clone)]
pub struct ChatbotClient {
    transport: Transport,
}

impl ChatbotClient {
    /// Create a new chatbot client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            transport: Transport::new(base_url, client),
        }
    }

    /// Create a client for `explicit`, falling back to `FOLIO_CHATBOT_URL`
    /// and then to [`DEFAULT_CHATBOT_URL`]
    pub fn from_env_or(explicit: Option<&str>, client: Client) -> Self {
        let base_url = endpoint::resolve_base_url(explicit, CHATBOT_URL_ENV, DEFAULT_CHATBOT_URL);
        Self::with_client(base_url, client)
    }

    /// Get the base URL of the chatbot
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// Whether the configured URL looks like a real deployment
    pub fn is_connected(&self) -> bool {
        endpoint::is_connected(self.base_url())
    }

    /// Send a chat message
    ///
    /// # Arguments
    /// * `message` - The user's message
    /// * `session_id` - Conversation to continue; the service default is used when `None`
    ///
    /// # Returns
    /// The bot's reply with detected intent, recommended products and follow-up suggestions
    pub async fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatResponse> {
        let request = self.transport.post("/chat").json(&ChatMessage {
            message: message.to_string(),
            session_id: session_id.map(str::to_string),
        });

        self.transport.send(request).await
    }

    /// List catalogue products
    ///
    /// # Arguments
    /// * `params` - Paging and category filter; unset values are not sent
    pub async fn get_products(&self, params: &ProductsParams) -> Result<Vec<Product>> {
        let request = self.transport.get("/products").query(&params.to_query());
        let envelope: ProductsEnvelope = self.transport.send(request).await?;

        Ok(envelope.into_products())
    }

    /// Search the catalogue
    ///
    /// # Arguments
    /// * `query` - Search text, overridden by `params.q` when that is set
    /// * `params` - Optional filters; unset values are not sent
    pub async fn search_products(
        &self,
        query: &str,
        params: &ProductSearchParams,
    ) -> Result<Vec<Product>> {
        let request = self
            .transport
            .get("/products/search")
            .query(&params.to_query(query));
        let envelope: ProductsEnvelope = self.transport.send(request).await?;

        Ok(envelope.into_products())
    }

    /// Check whether the chatbot and its backing services are up
    pub async fn health_check(&self) -> Result<HealthCheckResponse> {
        let request = self.transport.get("/health");
        self.transport.send(request).await
    }
}
