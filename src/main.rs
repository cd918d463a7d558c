use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use buildmate::chat::ChatMode;
use buildmate::config::BuildmateConfig;
use buildmate::stage::Stage;

mod cmd;

#[derive(Parser)]
#[command(name = "buildmate")]
#[command(version, about = "Guided PC build configurator with compatibility-checked parts")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to buildmate.toml. Defaults to ./buildmate.toml, then the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Compatibility service base URL. Overrides buildmate.toml and BUILDMATE_SERVICE_URL
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick parts stage by stage, with only compatible options offered
    Build {
        /// Limit the build to these stages (comma-separated keys, e.g. cpu,motherboard)
        #[arg(long, value_delimiter = ',', value_parser = parse_stage)]
        stages: Vec<Stage>,
    },
    /// Show the stage order and what each stage depends on
    Stages,
    /// Chat with the beginner assistant
    Chat,
    /// Describe your needs and get a structured requirement profile
    Recommend,
    /// Run the demo parts catalog service
    Serve {
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Enable dev mode (permissive CORS, listen on all interfaces)
        #[arg(long)]
        dev: bool,
    },
    /// View, validate or create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default buildmate.toml
    Init {
        /// Write to the user config directory instead of the current directory
        #[arg(long)]
        user: bool,
    },
}

fn parse_stage(key: &str) -> Result<Stage, String> {
    Stage::from_key(key.trim()).ok_or_else(|| {
        let keys: Vec<&str> = Stage::all().iter().map(|s| s.key()).collect();
        format!("unknown stage '{}' (expected one of: {})", key, keys.join(", "))
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "buildmate=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let load = || BuildmateConfig::load(cli.config.as_deref(), cli.service_url.as_deref(), cli.verbose);

    match &cli.command {
        Commands::Build { stages } => cmd::cmd_build(&load()?, stages.clone()).await?,
        Commands::Stages => cmd::cmd_stages(),
        Commands::Chat => cmd::cmd_chat(&load()?, ChatMode::Beginner).await?,
        Commands::Recommend => cmd::cmd_chat(&load()?, ChatMode::Recommendation).await?,
        Commands::Serve { port, dev } => cmd::cmd_serve(*port, *dev).await?,
        Commands::Config { command } => cmd::cmd_config(cli.config.as_deref(), command.clone())?,
    }

    Ok(())
}
