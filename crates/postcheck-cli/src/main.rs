//! postcheck: score job and internship postings as genuine, suspect or fake.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use postcheck_core::{EngineConfig, HeuristicScorer};
use postcheck_runtime::Engine;

mod input;
mod render;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding vectorizer and classifier artifacts
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Never consult the trained model
    #[arg(long, global = true)]
    no_model: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a posting with the model, falling back to heuristics
    Check {
        /// Posting text; read from --file or stdin when omitted
        text: Option<String>,

        /// Read the posting from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run only the red-flag heuristic and show what triggered
    Heuristic {
        /// Posting text; read from --file or stdin when omitted
        text: Option<String>,

        /// Read the posting from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List red-flag categories and their patterns
    Patterns,
    /// Try to load the artifacts and report their state
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Check { text, file, json } => {
            let posting = input::read_posting(text.as_deref(), file.as_deref())?;
            let engine = Engine::from_config(&config);
            let prediction = engine.predict_explained(&posting);

            if json {
                let out = serde_json::json!({
                    "verdict": prediction.verdict,
                    "percent": prediction.verdict.percent(),
                    "fallback": prediction.fallback,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render::prediction(&prediction));
            }
        }
        Commands::Heuristic { text, file, json } => {
            let posting = input::read_posting(text.as_deref(), file.as_deref())?;
            let result = HeuristicScorer::with_calibration(&config.calibration).score(&posting);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::heuristic(&result));
            }
        }
        Commands::Patterns => {
            print!("{}", render::patterns());
        }
        Commands::Status { json } => {
            let engine = Engine::from_config(&config);
            let available = engine.provider().get_classifier().is_available();
            let status = engine.provider().status();

            if json {
                let out = serde_json::json!({
                    "available": available,
                    "status": status,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render::status(&status));
                println!(
                    "Model tier: {}",
                    if available { "available" } else { "unavailable" }
                );
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(dir) = &cli.model_dir {
        config.artifacts.dir = dir.clone();
    }
    if cli.no_model {
        config.artifacts.enabled = false;
    }

    tracing::debug!(
        model_dir = %config.artifacts.dir.display(),
        model_enabled = config.artifacts.enabled,
        "Configuration loaded"
    );

    Ok(config)
}
