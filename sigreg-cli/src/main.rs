//! sigreg CLI
//!
//! Registers artifacts as signals and correlates new artifacts against them.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sigreg_core::{CorrelationQuery, RegistryConfig};
use sigreg_embed::create_provider;
use sigreg_engine::{Correlator, Registrar};
use sigreg_store::{write_json_atomic, IndexRepository, RecordStore};

#[derive(Parser)]
#[command(name = "sigreg")]
#[command(author, version, about = "sigreg: signal registry with embedding correlation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Registry root directory (overrides the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an artifact as a signal
    Register {
        /// Artifact file (markdown with optional YAML front-matter)
        #[arg(short, long)]
        input: PathBuf,

        /// Signal id (overrides the front-matter id)
        #[arg(long)]
        id: Option<String>,
    },

    /// Find registered signals correlated with a new artifact
    Correlate {
        /// Query JSON: {"title": ..., "intent": ..., "key_phrases": [...]}
        #[arg(short, long)]
        query: String,

        /// Output file for the correlation result
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List registered signals
    List,

    /// Show the full record of a signal
    Show {
        /// Signal id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let mut config = RegistryConfig::load_or_default(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.store.root = root;
    }

    match cli.command {
        Commands::Register { input, id } => {
            let provider = create_provider(&config.embedding, cli.api_key.as_deref());
            let registrar = Registrar::new(&config, provider);
            let signal = registrar.register_file(&input, id.as_deref()).await?;
            println!("Registered: {}", signal.id);
        }
        Commands::Correlate { query, output } => {
            let query: CorrelationQuery =
                serde_json::from_str(&query).context("Query must be a JSON object")?;
            let provider = create_provider(&config.embedding, cli.api_key.as_deref());
            let result = Correlator::new(&config, provider).correlate(&query).await;

            write_json_atomic(&output, &result)?;
            println!(
                "Correlation: {} (score: {:.2})",
                result.recommendation, result.top_score
            );
        }
        Commands::List => list_signals(&config)?,
        Commands::Show { id } => show_signal(&config, &id)?,
    }

    Ok(())
}

fn list_signals(config: &RegistryConfig) -> Result<()> {
    let index = IndexRepository::from_config(&config.store).load()?;

    if index.is_empty() {
        println!("No signals registered.");
        return Ok(());
    }

    for (id, entry) in index.iter() {
        let embedded = if entry.embedding_ref.is_some() { "yes" } else { "no" };
        println!("{}\t{}\tembedded: {}", id, entry.title, embedded);
    }
    println!("\n{} signals", index.len());
    Ok(())
}

fn show_signal(config: &RegistryConfig, id: &str) -> Result<()> {
    let index = IndexRepository::from_config(&config.store).load()?;
    if !index.contains(id) {
        bail!("Unknown signal: {}", id);
    }

    match RecordStore::from_config(&config.store).load(id)? {
        Some(signal) => println!("{}", serde_json::to_string_pretty(&signal)?),
        None => bail!("Signal {} is indexed but has no stored record", id),
    }
    Ok(())
}
