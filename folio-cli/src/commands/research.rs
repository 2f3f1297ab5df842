//! Research command handlers
//!
//! Runs research sessions through the session poller and exposes the
//! agent's service endpoints (health, memory, API keys, stored sessions).

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use folio_client::ResearchAgentClient;
use folio_core::domain::session::{LocalStatus, RemoteStatus, Session};
use folio_poller::SessionPoller;
use folio_poller::scheduler::TerminalArtifacts;
use tracing::{debug, info};

use super::client_failure;
use super::progress::ProgressLog;
use crate::config::Config;

/// Research subcommands
#[derive(Subcommand)]
pub enum ResearchCommands {
    /// Start a research session and follow it to completion
    Run {
        /// What to research
        query: String,

        /// Print the final session as JSON instead of streaming progress
        #[arg(long)]
        json: bool,
    },
    /// Check the agent's health
    Health,
    /// Show the agent's conversation memory
    Memory,
    /// Clear the agent's conversation memory
    ClearMemory,
    /// Show API key usage
    Keys,
    /// Get the current status of a session
    Status {
        /// Session ID returned when the session was started
        session_id: String,
    },
    /// Get the final response, reflection and execution trace of a session
    Result {
        /// Session ID returned when the session was started
        session_id: String,
    },
}

/// Handle research commands
///
/// # Arguments
/// * `command` - The research command to execute
/// * `config` - The CLI configuration
pub async fn handle_research_command(command: ResearchCommands, config: &Config) -> Result<()> {
    let client = config.research_client()?;
    debug!("Research agent at {}", client.base_url());

    match command {
        ResearchCommands::Run { query, json } => run_session(client, config, &query, json).await,
        ResearchCommands::Health => health(&client).await,
        ResearchCommands::Memory => memory(&client).await,
        ResearchCommands::ClearMemory => clear_memory(&client).await,
        ResearchCommands::Keys => keys(&client).await,
        ResearchCommands::Status { session_id } => status(&client, &session_id).await,
        ResearchCommands::Result { session_id } => result(&client, &session_id).await,
    }
}

/// Start a session and stream its progress until it settles or Ctrl-C
async fn run_session(
    client: ResearchAgentClient,
    config: &Config,
    query: &str,
    json: bool,
) -> Result<()> {
    let mut poller = SessionPoller::new(Arc::new(client), config.poller.clone());
    let mut rx = poller.subscribe();

    if let Err(e) = poller.start(query).await {
        if json {
            print_json(&poller.snapshot())?;
        }
        return Err(e).context("Failed to start research session");
    }

    let session = poller.snapshot();
    if !json {
        println!(
            "{} Session {}",
            "✓".green(),
            session.session_id.as_deref().unwrap_or_default().cyan()
        );
    }

    let mut progress = ProgressLog::default();
    let session = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                poller.reset();
                info!("Session cancelled");
                if !json {
                    println!("{}", "Cancelled.".yellow());
                }
                return Ok(());
            }
            changed = rx.changed() => {
                changed.context("Session poller stopped unexpectedly")?;
                let session = rx.borrow_and_update().clone();
                if !json {
                    for line in progress.update(&session) {
                        println!("{}", line);
                    }
                }
                if session.status.is_terminal() {
                    break session;
                }
            }
        }
    };

    if json {
        print_json(&session)?;
    } else {
        print_outcome(&session);
    }

    match (&session.status, &session.error) {
        (LocalStatus::Failed, Some(error)) => anyhow::bail!("Research session failed: {}", error),
        _ => Ok(()),
    }
}

/// Check agent health
async fn health(client: &ResearchAgentClient) -> Result<()> {
    let health = client
        .health_check()
        .await
        .map_err(|e| client_failure(e, "Failed to reach research agent", client.base_url()))?;

    let status = if health.status.eq_ignore_ascii_case("healthy") {
        health.status.green()
    } else {
        health.status.yellow()
    };

    println!("{}", "Research Agent:".bold());
    println!("  URL:             {}", client.base_url().dimmed());
    println!("  Status:          {}", status);
    if let Some(initialized) = health.agent_initialized {
        println!("  Initialized:     {}", initialized);
    }
    if let Some(sessions) = health.active_sessions {
        println!("  Active sessions: {}", sessions);
    }
    if let Some(timestamp) = &health.timestamp {
        println!("  Checked at:      {}", timestamp.dimmed());
    }
    if !client.is_connected() {
        println!(
            "{}",
            "⚠ Endpoint looks like a placeholder; sessions cannot be started".yellow()
        );
    }

    Ok(())
}

/// Show conversation memory
async fn memory(client: &ResearchAgentClient) -> Result<()> {
    let summary = client
        .get_memory_summary()
        .await
        .map_err(|e| client_failure(e, "Failed to load memory summary", client.base_url()))?;

    println!("{}", "Memory:".bold());
    println!("  Conversations:    {}", summary.total_conversations);
    println!("  Semantic search:  {}", summary.semantic_enabled);
    println!("  Cached embeddings: {}", summary.embeddings_cached);
    println!("  File size:        {} bytes", summary.memory_file_size);
    println!("  Confidence trend: {:.2}", summary.confidence_trend);
    if !summary.latest_conversation.is_empty() {
        println!("  Latest:           {}", summary.latest_conversation.dimmed());
    }

    if !summary.recent_topics.is_empty() {
        println!("\n{}", "Recent topics:".bold());
        for topic in &summary.recent_topics {
            println!("  {} {}", "▸".cyan(), topic);
        }
    }

    Ok(())
}

/// Clear conversation memory
async fn clear_memory(client: &ResearchAgentClient) -> Result<()> {
    let cleared = client
        .clear_memory()
        .await
        .map_err(|e| client_failure(e, "Failed to clear memory", client.base_url()))?;

    println!("{} Memory cleared ({})", "✓".green(), cleared.status);
    Ok(())
}

/// Show API key usage
async fn keys(client: &ResearchAgentClient) -> Result<()> {
    let keys = client
        .get_key_status()
        .await
        .map_err(|e| client_failure(e, "Failed to load key status", client.base_url()))?;

    println!("{}", "API Keys:".bold());
    println!("  Total:     {}", keys.total_keys);
    println!("  Available: {}", keys.available_keys.to_string().green());
    println!("  Exhausted: {}", keys.exhausted_keys.to_string().red());

    if !keys.request_counts.is_empty() {
        println!("\n{}", "Usage:".bold());
        let mut usage: Vec<_> = keys.request_counts.iter().collect();
        usage.sort_by(|a, b| a.0.cmp(b.0));
        for (key, stats) in usage {
            println!(
                "  {}  {} request(s), last used {}",
                key.cyan(),
                stats.requests,
                stats.last_used.as_deref().unwrap_or("never").dimmed()
            );
        }
    }

    Ok(())
}

/// Show the status of a stored session
async fn status(client: &ResearchAgentClient, session_id: &str) -> Result<()> {
    let status = client
        .get_status(session_id)
        .await
        .map_err(|e| {
            client_failure(
                e,
                &format!("Failed to get status of session {}", session_id),
                client.base_url(),
            )
        })?;

    println!("{}", "Session Status:".bold());
    println!("  ID:         {}", status.session_id.cyan());
    println!("  Status:     {}", colorize_remote_status(&status.status));
    println!("  Complete:   {}", status.complete);
    println!("  Activity:   {}", status.activity);
    println!("  Confidence: {:.0}%", status.confidence * 100.0);

    if !status.plan_steps.is_empty() {
        println!("\n{}", "Plan:".bold());
        for (i, step) in status.plan_steps.iter().enumerate() {
            let marker = if i as i64 == status.current_step {
                "▸".cyan()
            } else {
                " ".normal()
            };
            println!("  {} {}. {}", marker, i + 1, step);
        }
    }

    if !status.step_results.is_empty() {
        println!("\n{}", "Step results:".bold());
        for entry in &status.step_results {
            println!(
                "  [{}] step {}: {}",
                entry.timestamp.dimmed(),
                entry.step + 1,
                entry.result
            );
        }
    }

    Ok(())
}

/// Show the terminal artifacts of a stored session
async fn result(client: &ResearchAgentClient, session_id: &str) -> Result<()> {
    let artifacts = TerminalArtifacts::fetch(client, session_id).await;

    let mut session = Session::default();
    artifacts.apply_to(&mut session);
    print_outcome(&session);

    if artifacts.failures().count() == 3 {
        anyhow::bail!("No artifacts available for session {}", session_id);
    }

    Ok(())
}

/// Print the final state of a session
fn print_outcome(session: &Session) {
    if let Some(error) = &session.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
        return;
    }

    if let Some(response) = &session.final_response {
        println!("\n{}", "Response:".bold());
        println!("{}", response);
    }

    if let Some(reflection) = &session.reflection {
        println!("\n{}", "Reflection:".bold());
        println!("{}", reflection.dimmed());
    }

    if let Some(history) = &session.execution_history {
        println!("\n{}", format!("Execution ({} step(s)):", history.len()).bold());
        for entry in history {
            println!("  {} {}", "▸".cyan(), entry);
        }
    }

    for failure in &session.artifact_failures {
        println!(
            "{}",
            format!("⚠ {} unavailable: {}", failure.artifact, failure.message).yellow()
        );
    }
}

fn print_json(session: &Session) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(session).context("Failed to serialize session")?;
    println!("{}", rendered);
    Ok(())
}

/// Colorize remote status for display
fn colorize_remote_status(status: &RemoteStatus) -> colored::ColoredString {
    let status_str = format!("{:?}", status);
    match status {
        RemoteStatus::Starting => status_str.yellow(),
        RemoteStatus::Processing => status_str.cyan(),
        RemoteStatus::Complete => status_str.green(),
        RemoteStatus::Error => status_str.red(),
        RemoteStatus::Unknown => status_str.dimmed(),
    }
}
