//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod chatbot;
mod progress;
mod research;

pub use chatbot::ChatbotCommands;
pub use research::ResearchCommands;

use anyhow::Result;
use clap::Subcommand;
use folio_client::ClientError;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Research agent sessions and service state
    Research {
        #[command(subcommand)]
        command: ResearchCommands,
    },
    /// Shopping chatbot conversations and catalogue
    Chatbot {
        #[command(subcommand)]
        command: ChatbotCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Research { command } => research::handle_research_command(command, config).await,
        Commands::Chatbot { command } => chatbot::handle_chatbot_command(command, config).await,
    }
}

/// Wraps a failed backend call with what went wrong in user terms
///
/// # Arguments
/// * `err` - The client error
/// * `action` - What was being attempted, e.g. "Failed to list products"
/// * `base_url` - The backend that was called
pub fn client_failure(err: ClientError, action: &str, base_url: &str) -> anyhow::Error {
    let hint = if err.is_transport() {
        Some(format!("{} is unreachable", base_url))
    } else if err.is_not_found() {
        Some("not found".to_string())
    } else if err.is_client_error() {
        Some("request rejected".to_string())
    } else if err.is_server_error() {
        Some(format!("{} reported an internal error", base_url))
    } else {
        None
    };

    match hint {
        Some(hint) => anyhow::Error::new(err).context(format!("{} ({})", action, hint)),
        None => anyhow::Error::new(err).context(action.to_string()),
    }
}
