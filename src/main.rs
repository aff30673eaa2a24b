//! Word Grid Game Server
//!
//! Loads the word list and serves the single game arena over WebSocket.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use word_grid::{
    VERSION, GRID_SIZE, MIN_WORD_LENGTH,
    game::{Dictionary, SessionEngine},
    network::{GameServer, ServerConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Word Grid Server v{}", VERSION);

    let config = ServerConfig::from_env().context("reading server configuration")?;
    info!("Board: {}x{}, minimum word length {}", GRID_SIZE, GRID_SIZE, MIN_WORD_LENGTH);
    info!("Default round: {} seconds", config.default_duration_secs);

    let dictionary = Dictionary::load(&config.dictionary_path)
        .with_context(|| format!("loading dictionary from {}", config.dictionary_path.display()))?;

    let engine = SessionEngine::new(dictionary);
    let server = GameServer::new(config, engine);

    tokio::select! {
        result = server.run() => result.context("game server failed")?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            server.shutdown();
        }
    }

    Ok(())
}
