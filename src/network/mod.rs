//! Network Layer
//!
//! WebSocket adapter between clients and the session engine.
//! No game rules live here; every request maps onto one engine operation.

pub mod protocol;
pub mod server;

pub use protocol::{
    ClientMessage, ServerMessage, StartRequest, SubmitRequest,
    SessionInfo, GameStateUpdate, ServerError, ErrorCode,
};
pub use server::{GameServer, ServerConfig, ConfigError, GameServerError, handle_client_message};
