//! Folio CLI
//!
//! Command-line front end for the research agent and shopping chatbot demos.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Research agent and shopping chatbot client", long_about = None)]
struct Cli {
    /// Research agent base URL
    #[arg(long, global = true, env = "FOLIO_RESEARCH_AGENT_URL")]
    research_url: Option<String>,

    /// Shopping chatbot base URL
    #[arg(long, global = true, env = "FOLIO_CHATBOT_URL")]
    chatbot_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "FOLIO_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_cli=info,folio_poller=warn,folio_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.research_url, cli.chatbot_url, cli.timeout_secs)?;

    handle_command(cli.command, &config).await
}
