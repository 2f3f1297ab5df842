//! Shopping chatbot DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    /// The service falls back to its own default session when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// A catalogue product
///
/// Backends disagree on which fields they fill, so every known field is
/// optional and anything unrecognised is kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, rename = "originalPrice", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, rename = "reviewCount", skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(default, rename = "discountPercentage", skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, rename = "inStock", skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl Product {
    /// Best available display name
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("(unnamed product)")
    }
}

/// Product list responses come in two shapes depending on the backend version
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductsEnvelope {
    /// `{ "products": [...] , ... }`
    Wrapped { products: Vec<Product> },
    /// `[...]`
    Bare(Vec<Product>),
}

impl ProductsEnvelope {
    pub fn into_products(self) -> Vec<Product> {
        match self {
            ProductsEnvelope::Wrapped { products } => products,
            ProductsEnvelope::Bare(products) => products,
        }
    }
}

/// Query parameters for `GET /products`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub category: Option<String>,
}

impl ProductsParams {
    /// Query pairs for the parameters that are set
    ///
    /// Zero and empty values are treated as unset.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_positive(&mut query, "limit", self.limit);
        push_positive(&mut query, "offset", self.offset);
        push_text(&mut query, "category", self.category.as_deref());
        query
    }
}

/// Query parameters for `GET /products/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductSearchParams {
    /// Overrides the positional query when set
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub rating_min: Option<f64>,
    pub in_stock: Option<bool>,
    pub discount_min: Option<f64>,
    pub tags: Option<String>,
}

impl ProductSearchParams {
    /// Search params that only carry a result limit
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Query pairs for a search on `query`, `q` first
    pub fn to_query(&self, query: &str) -> Vec<(&'static str, String)> {
        let q = self
            .q
            .as_deref()
            .filter(|q| !q.is_empty())
            .unwrap_or(query);

        let mut pairs = vec![("q", q.to_string())];
        push_positive(&mut pairs, "limit", self.limit);
        push_text(&mut pairs, "brand", self.brand.as_deref());
        push_text(&mut pairs, "category", self.category.as_deref());
        if let Some(rating) = self.rating_min.filter(|r| *r != 0.0) {
            pairs.push(("rating_min", rating.to_string()));
        }
        // false is meaningful here, unlike the numeric filters
        if let Some(in_stock) = self.in_stock {
            pairs.push(("in_stock", in_stock.to_string()));
        }
        if let Some(discount) = self.discount_min.filter(|d| *d != 0.0) {
            pairs.push(("discount_min", discount.to_string()));
        }
        push_text(&mut pairs, "tags", self.tags.as_deref());
        pairs
    }
}

fn push_positive(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u32>) {
    if let Some(v) = value.filter(|v| *v > 0) {
        query.push((key, v.to_string()));
    }
}

fn push_text(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        query.push((key, v.to_string()));
    }
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_monitoring: Option<UsageMonitoring>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMonitoring {
    pub daily_requests: u64,
    pub monthly_embeddings: u64,
    pub free_tier_limits: FreeTierLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeTierLimits {
    pub daily_requests_limit: u64,
    pub monthly_embeddings_limit: u64,
    #[serde(default)]
    pub note: String,
}
