use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use zenbot_core::AppConfig;
use zenbot_server::bootstrap;

#[derive(Parser)]
#[command(name = "zenbot")]
#[command(about = "ZenBot - supportive chat backend with provider fallback", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides configuration)
    #[arg(long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// List Gemini models available to the configured key
    CheckModels,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!("Starting ZenBot v{}", env!("CARGO_PKG_VERSION"));
            let state = bootstrap::build_state(&config);
            zenbot_server::run(state, &config.server.bind).await?;
        }
        Commands::CheckModels => bootstrap::check_models(&config).await?,
    }

    Ok(())
}
