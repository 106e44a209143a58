//! Anonboard CLI
//!
//! Command-line front end for the anonymous review board:
//! - Show the board
//! - Add a card
//! - Move a card to done
//! - Read or acknowledge the manifesto

use anonboard::config::{generate_default_config, Config, LoggingConfig};
use anonboard::controller::{CloseInteraction, MANIFESTO_TEXT, MANIFESTO_TITLE};
use anonboard::{
    BoardController, CardId, FileStorage, HttpCardApi, LocalState, OutputFormat,
    TerminalRenderer,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "anonboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Anonymous review board client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Card API URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/anonboard/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the board
    Board,

    /// Add a card to To Review
    Add {
        /// Card message (1-800 characters)
        message: String,
    },

    /// Move a card to Done
    Close {
        /// Card ID
        id: String,
        /// Who is moving the card
        #[arg(long)]
        by: String,
    },

    /// Show the manifesto
    Manifesto {
        /// Mark the manifesto as understood
        #[arg(long)]
        ack: bool,
    },

    /// Print this profile's anonymous client token
    Token,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("anonboard={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default().context("loading default config")?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging);
    tracing::debug!("Anonboard v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let local = Arc::new(LocalState::new(FileStorage::new(&config.local.state_file)));
    let settings = config.board.settings();

    match cli.command {
        Commands::Token => {
            println!("{}", local.client_token());
            return Ok(());
        }
        Commands::Manifesto { ack } => {
            println!("{}", MANIFESTO_TITLE);
            println!();
            println!("{}", MANIFESTO_TEXT);
            if ack {
                local.acknowledge();
                println!();
                println!("Acknowledged.");
            }
            return Ok(());
        }
        _ => {}
    }

    let api = Arc::new(HttpCardApi::new(&config.api.base_url, local.client_token()));
    let renderer = Arc::new(TerminalRenderer::new(OutputFormat::parse(&cli.format)));
    let board = BoardController::new(api, local, renderer.clone(), settings);

    let init = board.init().await;
    let loaded = board.is_loaded().await;

    let result = match cli.command {
        Commands::Board => init.map(|_| ()),
        Commands::Add { message } => {
            board.input_changed(&message).await;
            board.submit().await.map(|_| ())
        }
        // Without a loaded board every close looks like "not awaiting review"
        Commands::Close { .. } if !loaded => init,
        Commands::Close { id, by } => {
            let id = CardId::new(id);
            match board.settings().close_interaction {
                CloseInteraction::Inline => {
                    board.set_closer_input(&id, &by).await;
                    board.close_inline(&id).await.map(|_| ())
                }
                CloseInteraction::Modal => {
                    board.open_close_modal(&id).await;
                    board.set_modal_closer(&by).await;
                    board.confirm_close_modal().await.map(|_| ())
                }
            }
        }
        Commands::Manifesto { .. } | Commands::Token | Commands::Config { .. } => Ok(()),
    };

    renderer.write_to(&mut std::io::stdout())?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
