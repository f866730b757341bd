//! Wire protocol for chess duels.
//!
//! Messages are JSON objects tagged by a snake_case `type` field:
//!
//! - client → server: `select_piece`, `move`
//! - server → client: `info`, `game_start`, `your_turn`, `possible_moves`,
//!   `game_over`, `error`
//!
//! Coordinates on the wire are `{row, col}` with row 0 being rank 8 and
//! col 0 file `a`. Incoming coordinates are kept signed so that off-board
//! values can be rejected by the receiver instead of failing to decode.

mod message;

pub use message::{Candidate, ClientMessage, ServerMessage, SquareRef};

use thiserror::Error;

/// WebSocket close code sent to a connection turned away because both seats are taken.
pub const CLOSE_GAME_FULL: u16 = 1008;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid message format: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decodes a client request from a text frame.
pub fn decode_client(text: &str) -> Result<ClientMessage, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// Decodes a server message from a text frame.
pub fn decode_server(text: &str) -> Result<ServerMessage, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

/// Encodes any protocol message as a text frame.
pub fn encode<T: serde::Serialize>(message: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}
