//! Chatbot command handlers
//!
//! Conversation and catalogue commands for the shopping chatbot.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use folio_client::ChatbotClient;
use folio_core::dto::chatbot::{Product, ProductSearchParams, ProductsParams};
use uuid::Uuid;

use super::client_failure;
use crate::config::Config;

/// Chatbot subcommands
#[derive(Subcommand)]
pub enum ChatbotCommands {
    /// Send a message to the chatbot
    Chat {
        /// Message text
        message: String,

        /// Conversation to continue; a new one is started when omitted
        #[arg(long)]
        session_id: Option<String>,
    },
    /// List catalogue products
    Products {
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,

        #[arg(long)]
        category: Option<String>,
    },
    /// Search the catalogue
    Search {
        /// Search text
        query: String,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Minimum rating
        #[arg(long)]
        rating_min: Option<f64>,

        /// Only products that are (true) or are not (false) in stock
        #[arg(long)]
        in_stock: Option<bool>,

        /// Minimum discount percentage
        #[arg(long)]
        discount_min: Option<f64>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Check the chatbot's health
    Health,
}

/// Handle chatbot commands
///
/// # Arguments
/// * `command` - The chatbot command to execute
/// * `config` - The CLI configuration
pub async fn handle_chatbot_command(command: ChatbotCommands, config: &Config) -> Result<()> {
    let client = config.chatbot_client()?;

    match command {
        ChatbotCommands::Chat {
            message,
            session_id,
        } => chat(&client, &message, session_id).await,
        ChatbotCommands::Products {
            limit,
            offset,
            category,
        } => {
            let params = ProductsParams {
                limit,
                offset,
                category,
            };
            list_products(&client, &params).await
        }
        ChatbotCommands::Search {
            query,
            limit,
            brand,
            category,
            rating_min,
            in_stock,
            discount_min,
            tags,
        } => {
            let params = ProductSearchParams {
                q: None,
                limit,
                brand,
                category,
                rating_min,
                in_stock,
                discount_min,
                tags,
            };
            search(&client, &query, &params).await
        }
        ChatbotCommands::Health => health(&client).await,
    }
}

/// Send one chat message
async fn chat(client: &ChatbotClient, message: &str, session_id: Option<String>) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        anyhow::bail!("Message is empty");
    }

    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let reply = client
        .send_message(message, Some(&session_id))
        .await
        .map_err(|e| client_failure(e, "Failed to send message", client.base_url()))?;

    println!("{}", reply.response);
    if !reply.intent.is_empty() {
        println!("{}", format!("intent: {}", reply.intent).dimmed());
    }

    if !reply.products.is_empty() {
        println!("\n{}", "Products:".bold());
        for product in &reply.products {
            print_product(product);
        }
    }

    if !reply.suggestions.is_empty() {
        println!("\n{}", "Try asking:".bold());
        for suggestion in &reply.suggestions {
            println!("  {} {}", "▸".cyan(), suggestion);
        }
    }

    println!(
        "\n{}",
        format!("Continue with --session-id {}", session_id).dimmed()
    );

    Ok(())
}

/// List products
async fn list_products(client: &ChatbotClient, params: &ProductsParams) -> Result<()> {
    let products = client
        .get_products(params)
        .await
        .map_err(|e| client_failure(e, "Failed to list products", client.base_url()))?;

    print_products(&products);
    Ok(())
}

/// Search products
async fn search(client: &ChatbotClient, query: &str, params: &ProductSearchParams) -> Result<()> {
    let products = client
        .search_products(query, params)
        .await
        .map_err(|e| client_failure(e, "Failed to search products", client.base_url()))?;

    print_products(&products);
    Ok(())
}

/// Check chatbot health
async fn health(client: &ChatbotClient) -> Result<()> {
    let health = client
        .health_check()
        .await
        .map_err(|e| client_failure(e, "Failed to reach chatbot", client.base_url()))?;

    let status = if health.status.eq_ignore_ascii_case("healthy") {
        health.status.green()
    } else {
        health.status.yellow()
    };

    println!("{}", "Chatbot:".bold());
    println!("  URL:         {}", client.base_url().dimmed());
    println!("  Status:      {}", status);
    if !health.project.is_empty() {
        println!("  Project:     {} ({})", health.project, health.project_id.dimmed());
    }
    if !health.environment.is_empty() {
        println!("  Environment: {}", health.environment);
    }

    if let Some(services) = &health.services {
        println!("\n{}", "Services:".bold());
        let mut services: Vec<_> = services.iter().collect();
        services.sort();
        for (name, state) in services {
            println!("  {:<12} {}", name, state);
        }
    }

    if let Some(usage) = &health.usage_monitoring {
        let limits = &usage.free_tier_limits;
        println!("\n{}", "Usage:".bold());
        println!(
            "  Daily requests:     {}/{}",
            usage.daily_requests, limits.daily_requests_limit
        );
        println!(
            "  Monthly embeddings: {}/{}",
            usage.monthly_embeddings, limits.monthly_embeddings_limit
        );
        if !limits.note.is_empty() {
            println!("  {}", limits.note.dimmed());
        }
    }

    Ok(())
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("{}", "No products found.".yellow());
        return;
    }

    println!("{}", format!("Found {} product(s):", products.len()).bold());
    println!();
    for product in products {
        print_product(product);
    }
}

/// Print a one-product summary
fn print_product(product: &Product) {
    println!("  {} {}", "▸".cyan(), product.display_name());

    let mut details = Vec::new();
    if let Some(price) = product.price {
        match product.original_price.filter(|original| *original > price) {
            Some(original) => details.push(format!("${:.2} (was ${:.2})", price, original)),
            None => details.push(format!("${:.2}", price)),
        }
    }
    if let Some(brand) = &product.brand {
        details.push(brand.clone());
    }
    if let Some(rating) = product.rating {
        details.push(format!("★ {:.1}", rating));
    }
    match product.in_stock {
        Some(true) => details.push("in stock".to_string()),
        Some(false) => details.push("out of stock".to_string()),
        None => {}
    }

    if !details.is_empty() {
        println!("    {}", details.join(" · ").dimmed());
    }
}
