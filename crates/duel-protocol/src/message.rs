//! Message types.

use duel_core::{Board, Color, Coord, CoordError};
use serde::{Deserialize, Serialize};

/// A square as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareRef {
    pub row: i64,
    pub col: i64,
}

impl SquareRef {
    /// Validates the square against the board bounds.
    pub fn to_coord(self) -> Result<Coord, CoordError> {
        Coord::try_from_signed(self.row, self.col)
    }
}

impl From<Coord> for SquareRef {
    fn from(c: Coord) -> Self {
        SquareRef {
            row: c.row() as i64,
            col: c.col() as i64,
        }
    }
}

/// One entry of a `possible_moves` reply. `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: usize,
    pub row: u8,
    pub col: u8,
}

impl Candidate {
    /// Numbers a candidate list in generation order, starting at 1.
    pub fn numbered(moves: &[Coord]) -> Vec<Candidate> {
        moves
            .iter()
            .enumerate()
            .map(|(i, c)| Candidate {
                index: i + 1,
                row: c.row(),
                col: c.col(),
            })
            .collect()
    }

    pub fn coord(&self) -> Option<Coord> {
        Coord::new(self.row, self.col)
    }
}

/// Requests sent by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the candidate destinations of the piece on a square.
    SelectPiece { row: i64, col: i64 },
    /// Submit a move.
    Move { from: SquareRef, to: SquareRef },
}

/// Messages sent to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Waiting-room notice.
    Info { message: String },
    /// Seat assignment with the initial board.
    GameStart {
        color: Color,
        board: Board,
        message: String,
    },
    /// Prompt to act.
    YourTurn { board: Board, message: String },
    /// Candidates for the selected square, in reference order.
    PossibleMoves { moves: Vec<Candidate> },
    /// A king was captured.
    GameOver {
        winner: Color,
        board: Board,
        message: String,
    },
    /// A rejected request.
    Error { message: String },
}

impl ServerMessage {
    pub fn info(message: impl Into<String>) -> Self {
        ServerMessage::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_piece_deserialization() {
        let json = r#"{"type":"select_piece","row":6,"col":4}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg, ClientMessage::SelectPiece { row: 6, col: 4 });
    }

    #[test]
    fn move_deserialization_keeps_off_board_values() {
        let json = r#"{"type":"move","from":{"row":0,"col":0},"to":{"row":-1,"col":0}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Move { from, to } => {
                assert!(from.to_coord().is_ok());
                assert!(to.to_coord().is_err());
            }
            _ => panic!("Expected Move message"),
        }
    }

    #[test]
    fn game_start_serialization() {
        let msg = ServerMessage::GameStart {
            color: Color::Black,
            board: Board::standard(),
            message: "Game started! You are black.".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "game_start");
        assert_eq!(json["color"], "black");
        assert_eq!(json["board"][7][4], "K");
        assert_eq!(json["board"][4][4], "");
    }

    #[test]
    fn possible_moves_serialization() {
        let moves = [Coord::new(5, 4).unwrap(), Coord::new(4, 4).unwrap()];
        let msg = ServerMessage::PossibleMoves {
            moves: Candidate::numbered(&moves),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"possible_moves","moves":[{"index":1,"row":5,"col":4},{"index":2,"row":4,"col":4}]}"#
        );
    }

    #[test]
    fn possible_moves_deserialization() {
        let json = r#"{"type":"possible_moves","moves":[{"index":1,"row":5,"col":4}]}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        match msg {
            ServerMessage::PossibleMoves { moves } => {
                assert_eq!(moves[0].coord(), Coord::new(5, 4));
            }
            _ => panic!("Expected PossibleMoves message"),
        }
    }

    #[test]
    fn error_and_info_serialization() {
        let json = serde_json::to_string(&ServerMessage::error("It's not your turn.")).unwrap();
        assert_eq!(json, r#"{"type":"error","message":"It's not your turn."}"#);
        let json = serde_json::to_string(&ServerMessage::info("Waiting for an opponent...")).unwrap();
        assert!(json.contains("\"type\":\"info\""));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(crate::decode_client(r#"{"type":"resign"}"#).is_err());
        assert!(crate::decode_client("not json").is_err());
    }
}
