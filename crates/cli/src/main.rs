//! Symptom Prediction CLI
//!
//! A command-line tool for querying the disease prediction service:
//! health checks, symptom search, predictions, and deployment validation.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, health, predict, symptoms};

/// Symptom Prediction CLI
#[derive(Parser)]
#[command(name = "sympred")]
#[command(author, version, about = "CLI for the Symptom Prediction Service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via SYMPRED_API_URL env var)
    #[arg(long, env = "SYMPRED_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show service health and available models
    Health,

    /// Search the symptom vocabulary
    Symptoms {
        /// Substring to search for (prefix matches rank first)
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Request a disease prediction
    Predict {
        /// Symptom to report (repeatable)
        #[arg(long = "symptom", short, required = true)]
        symptoms: Vec<String>,

        /// Model display name
        #[arg(long, default_value = "Decision Tree")]
        model: String,
    },

    /// Validate a deployment end to end
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Health => {
            health::show_health(&client, cli.format).await?;
        }
        Commands::Symptoms { query } => {
            symptoms::search_symptoms(&client, query, cli.format).await?;
        }
        Commands::Predict { symptoms, model } => {
            predict::run_prediction(&client, symptoms, model, cli.format).await?;
        }
        Commands::Check => {
            let issues = check::run_checks(&client).await;
            if issues > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
