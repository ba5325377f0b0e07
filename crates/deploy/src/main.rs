//! Owl Shoes provisioning CLI.
//!
//! # Usage
//!
//! ```bash
//! # Provision the assistant, tools, knowledge, and call analytics
//! owl-deploy deploy
//!
//! # Provision without the call-analytics step
//! owl-deploy deploy --skip-voice-intelligence
//!
//! # Only verify the webhook deployment is reachable
//! owl-deploy redeploy
//! ```
//!
//! # Commands
//!
//! - `deploy` - Run the full provisioning pipeline
//! - `redeploy` - Re-check the webhook deployment after pushing new code

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod client;
mod config;
mod descriptors;
mod envfile;
mod error;
mod pipeline;

use client::ManagementClient;
use config::DeployConfig;
use error::DeployError;
use pipeline::Provisioner;

#[derive(Parser)]
#[command(name = "owl-deploy")]
#[command(author, version, about = "Owl Shoes assistant provisioning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full provisioning pipeline
    Deploy {
        /// Skip the call-analytics (Voice Intelligence) step
        #[arg(long)]
        skip_voice_intelligence: bool,
    },
    /// Verify the webhook deployment is reachable
    Redeploy,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), DeployError> {
    let config = DeployConfig::from_env()?;
    let client = ManagementClient::new(config.account_sid.clone(), config.auth_token.clone());

    match cli.command {
        Commands::Deploy {
            skip_voice_intelligence,
        } => {
            let summary = Provisioner::new(&client, &config)
                .run(skip_voice_intelligence)
                .await?;

            tracing::info!(
                assistant_id = %summary.assistant_id,
                tools = summary.tool_count,
                knowledge = summary.knowledge_count,
                intelligence_service_sid = summary.intelligence_service_sid.as_deref(),
                "deployment complete"
            );
        }
        Commands::Redeploy => {
            client.check_webhooks(&config.webhook_base_url).await?;
            tracing::info!(base_url = %config.webhook_base_url, "webhook deployment reachable");
        }
    }

    Ok(())
}
