//! WebSocket Game Server
//!
//! Async WebSocket adapter in front of the session engine. Every connection
//! plays in the same arena; end-of-session notices are pushed to all of them.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::Instant;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn, error, debug, instrument};

use crate::game::engine::SessionEngine;
use crate::game::session::SessionEnded;
use crate::network::protocol::{
    ClientMessage, ServerMessage, ServerError, ErrorCode, SessionInfo, GameStateUpdate,
};
use crate::DEFAULT_DURATION_SECS;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Word list file.
    pub dictionary_path: PathBuf,
    /// Round length when a start request names none (seconds).
    pub default_duration_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_connections: 64,
            dictionary_path: PathBuf::from("enable1.txt"),
            default_duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("WORD_GRID_BIND_ADDR") {
            config.bind_addr = parse_var("WORD_GRID_BIND_ADDR", addr)?;
        }
        if let Some(path) = lookup("WORD_GRID_DICTIONARY") {
            config.dictionary_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("WORD_GRID_DEFAULT_DURATION") {
            config.default_duration_secs = parse_var("WORD_GRID_DEFAULT_DURATION", secs)?;
        }
        if let Some(max) = lookup("WORD_GRID_MAX_CONNECTIONS") {
            config.max_connections = parse_var("WORD_GRID_MAX_CONNECTIONS", max)?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { var, value })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),
}

// =============================================================================
// SERVER
// =============================================================================

/// Connected client state.
struct ConnectedClient {
    /// Connection time.
    connected_at: Instant,
    /// Messages received.
    messages: u64,
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// Arena engine shared by all connections.
    engine: SessionEngine,
    /// Connected clients.
    clients: Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>,
    /// Pushed notifications (session end).
    events_tx: broadcast::Sender<ServerMessage>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Create a new game server.
    pub fn new(config: ServerConfig, engine: SessionEngine) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (events_tx, _) = broadcast::channel(64);

        Self {
            config,
            engine,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            events_tx,
            shutdown_tx,
        }
    }

    /// Bind the configured address and run the server.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Run the server on an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GameServerError> {
        info!("Game server listening on {}", listener.local_addr()?);

        let events_tx = self.events_tx.clone();
        self.engine
            .set_on_session_end(move |ended: &SessionEnded| {
                // No receivers just means nobody is connected.
                let _ = events_tx.send(ServerMessage::SessionEnded(ended.clone()));
            })
            .await;

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let clients_count = self.clients.read().await.len();
                            if clients_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        self.engine.clear_on_session_end().await;
        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let engine = self.engine.clone();
        let config = self.config.clone();
        let mut events_rx = self.events_tx.subscribe();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

            // Register client
            clients.write().await.insert(addr, ConnectedClient {
                connected_at: Instant::now(),
                messages: 0,
            });

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    let text = match msg.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        let text = match msg {
                            Some(Ok(Message::Text(text))) => text,
                            Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
                                Ok(text) => text,
                                Err(_) => {
                                    let _ = msg_tx.send(ServerMessage::error(
                                        ErrorCode::InvalidInput,
                                        "Binary frames must carry UTF-8 JSON",
                                    )).await;
                                    continue;
                                }
                            },
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            // Ping/pong frames are answered by tungstenite.
                            Some(Ok(_)) => continue,
                        };

                        if let Some(client) = clients.write().await.get_mut(&addr) {
                            client.messages += 1;
                        }

                        let reply = match ClientMessage::from_json(&text) {
                            Ok(client_msg) => handle_client_message(client_msg, &engine, &config).await,
                            Err(e) => {
                                debug!("Invalid message from {}: {}", addr, e);
                                ServerMessage::error(ErrorCode::InvalidInput, "Invalid message format")
                            }
                        };
                        if msg_tx.send(reply).await.is_err() {
                            break;
                        }
                    }
                    event = events_rx.recv() => {
                        match event {
                            Ok(msg) => {
                                let _ = msg_tx.send(msg).await;
                            }
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                warn!("Client {} missed {} notifications", addr, skipped);
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = msg_tx.send(ServerMessage::Shutdown {
                            reason: "Server shutting down".to_string(),
                        }).await;
                        break;
                    }
                }
            }

            // Let queued replies flush before closing.
            drop(msg_tx);
            if tokio::time::timeout(Duration::from_secs(1), sender_task).await.is_err() {
                debug!("Sender for {} did not flush in time", addr);
            }

            if let Some(client) = clients.write().await.remove(&addr) {
                info!(
                    "Client {} cleaned up after {:?} ({} messages)",
                    addr,
                    client.connected_at.elapsed(),
                    client.messages
                );
            }
        });
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// The arena engine.
    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }
}

/// Route one client request to the engine and build the reply.
pub async fn handle_client_message(
    msg: ClientMessage,
    engine: &SessionEngine,
    config: &ServerConfig,
) -> ServerMessage {
    match msg {
        ClientMessage::Start(req) => {
            let duration = req.duration_seconds.unwrap_or(config.default_duration_secs);
            match engine.start(duration).await {
                Ok(session) => ServerMessage::Started(SessionInfo::from_session(&session, Instant::now())),
                Err(e) => ServerMessage::Error(ServerError::from(&e)),
            }
        }
        ClientMessage::Submit(req) => match engine.submit(&req.path).await {
            Ok(result) => ServerMessage::Submission(result),
            Err(e) => ServerMessage::Error(ServerError::from(&e)),
        },
        ClientMessage::GetState => {
            let state = engine.state().await;
            ServerMessage::State(GameStateUpdate::from_state(state, Instant::now()))
        }
        ClientMessage::Ping { timestamp } => ServerMessage::Pong {
            timestamp,
            server_time: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
        },
    }
}
