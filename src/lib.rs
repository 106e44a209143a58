//! # Anonboard
//!
//! Client for an anonymous review board. Anyone can submit a short card;
//! cards wait in "To Review" until someone moves them to "Done" and puts
//! their name on it.
//!
//! ## Modules
//!
//! - [`cards`]: card model, validation, and the to-review / done views
//! - [`client`]: the remote card API (`CardApi`) and its HTTP client
//! - [`local`]: per-profile client token and onboarding flag
//! - [`controller`]: `BoardController`, which ties everything together
//! - [`render`]: the view model handed to front ends
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anonboard::{
//!     BoardController, BoardSettings, FileStorage, HttpCardApi, LocalState, OutputFormat,
//!     TerminalRenderer,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let local = Arc::new(LocalState::new(FileStorage::new("state.json")));
//!     let api = Arc::new(HttpCardApi::new("http://localhost:3000", local.client_token()));
//!     let renderer = Arc::new(TerminalRenderer::new(OutputFormat::Text));
//!
//!     let board = BoardController::new(api, local, renderer.clone(), BoardSettings::default());
//!     board.init().await?;
//!     board.submit_message("The staging deploy needs an owner").await?;
//!
//!     renderer.write_to(&mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod cards;
pub mod client;
pub mod config;
pub mod controller;
pub mod local;
pub mod render;

pub use cards::{
    BoardError, BoardResult, Card, CardId, CardStatus, CardStore, DisplayZone, WeekGroup,
    MAX_MESSAGE_CHARS,
};

pub use client::{ApiCall, CardApi, HttpCardApi, MemoryCardApi, CLIENT_TOKEN_HEADER};

pub use local::{FileStorage, LocalState, LocalStorage, MemoryStorage, StorageError};

pub use controller::{
    BoardController, BoardSettings, CloseInteraction, Dismissal, DoneDisplay, Outcome,
};

pub use render::{BoardView, OutputFormat, RecordingRenderer, Renderer, TerminalRenderer};

pub use config::{Config, ConfigError, LoggingConfig};
