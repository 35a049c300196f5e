//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config;

mod commands;

#[derive(Parser)]
#[command(name = "goatterm")]
#[command(version = "0.1")]
#[command(about = "Terminal persona chat")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the persona prompt from config
    #[arg(long)]
    persona: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Starts an interactive chat session
    Chat,

    /// Sends a single prompt and prints the reply
    Exec {
        /// The prompt to send
        prompt: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Logging goes to stderr so it never interleaves with the transcript.
/// Silent unless RUST_LOG asks for more.
fn init_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;

    if let Some(p) = cli.persona.as_deref() {
        let trimmed = p.trim();
        if trimmed.is_empty() {
            config.persona_prompt = None;
            config.persona_prompt_file = None;
        } else {
            config.persona_prompt = Some(trimmed.to_string());
            config.persona_prompt_file = None;
        }
    }

    // default to chat mode
    let Some(command) = cli.command else {
        return commands::chat::run(&config).await;
    };

    match command {
        Commands::Chat => commands::chat::run(&config).await,

        Commands::Exec { prompt } => commands::exec::run(&config, &prompt).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
