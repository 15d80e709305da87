//! LLM Rewriter - rewrite selected text with a local Ollama model
//!
//! Terminal front end: the selection comes from a file or stdin and the
//! rewrite goes to a file or stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use llm_rewriter::config::{config_path, Config};
use llm_rewriter::core::{select_default_model, ModelChoice};
use llm_rewriter::host::TerminalHost;
use llm_rewriter::{OllamaClient, Orchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite the selected text
    Rewrite {
        /// File holding the selection (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// File receiving the rewrite (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ollama model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List installed Ollama models and the default pick
    Models,

    /// Write the current settings to the config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Setup logging; stdout is reserved for rewritten text
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("✏️ LLM Rewriter v{} starting...", env!("CARGO_PKG_VERSION"));

    let client = OllamaClient::new(&config);

    match args.command {
        Command::Rewrite {
            input,
            output,
            model,
        } => {
            let host = Arc::new(TerminalHost::new(input, output));
            let mut orchestrator = Orchestrator::from_config(host, Arc::new(client), &config);
            if let Some(model) = model {
                orchestrator = orchestrator.with_model(&model);
            }

            let outcome = orchestrator.invoke().await;
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Command::Init => {
            match &args.config {
                Some(path) => config.save_to(path)?,
                None => config.save()?,
            }
            let path = args.config.unwrap_or_else(config_path);
            info!("💾 Config written to {}", path.display());
            println!("{}", path.display());
        }
        Command::Models => {
            if !client.health_check().await {
                eprintln!(
                    "Ollama does not appear to be running at {}.",
                    client.base_url()
                );
            }

            let models = client.catalog().await.map_err(|e| {
                anyhow::anyhow!(
                    "Error loading models: {}. Please ensure Ollama is running at {}.",
                    e,
                    client.base_url()
                )
            })?;

            let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
            let choice = select_default_model(&names);
            if let ModelChoice::NoModels = choice {
                println!("No models found in Ollama. Please ensure Ollama is running and models are downloaded.");
                return Ok(());
            }

            for name in &names {
                let marker = if choice.name() == Some(*name) { "*" } else { " " };
                println!("{} {}", marker, name);
            }
        }
    }

    Ok(())
}
