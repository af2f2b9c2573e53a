use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use copilot_application::SessionService;
use copilot_core::config::CopilotConfig;
use copilot_core::processing::PiiMode;
use copilot_infrastructure::ConfigService;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "cpa-copilot")]
#[command(about = "CPA Copilot - inspect and edit the persisted workpaper session", long_about = None)]
struct Cli {
    /// Directory holding the persisted session (overrides the config file)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current session and its derived views
    Show {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Reset the session and remove the stored record
    Clear,
    /// Append a file to the upload list
    AddUpload {
        /// File name
        name: String,
        /// Size in bytes
        size: u64,
    },
    /// Change processing options
    SetConfig {
        /// Enable Azure document extraction
        #[arg(long)]
        azure: Option<bool>,
        /// Enable Gemini document extraction
        #[arg(long)]
        gemini: Option<bool>,
        /// PII handling: mask, redact or none
        #[arg(long)]
        pii_mode: Option<PiiMode>,
    },
}

fn load_config(cli: &Cli) -> Result<CopilotConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigService::load_from(path),
        None => ConfigService::load_default(),
    }
    .context("Failed to load configuration")?;

    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = Some(dir.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&logging::LogConfig::from_verbosity(cli.verbose));

    let config = load_config(&cli)?;
    let service = SessionService::open(&config).context("Failed to open session storage")?;

    match cli.command {
        Commands::Show { json } => commands::show::run(&service, json).await?,
        Commands::Clear => commands::session::clear(&service).await?,
        Commands::AddUpload { name, size } => {
            commands::session::add_upload(&service, name, size).await?
        }
        Commands::SetConfig {
            azure,
            gemini,
            pii_mode,
        } => commands::session::set_config(&service, azure, gemini, pii_mode).await?,
    }

    Ok(())
}
