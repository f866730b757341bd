//! Game state: board, side to move and result.
//!
//! [`Game`] is the only place a board changes during play. It does not know
//! who is playing; seats and turn ownership belong to the session layer.

use duel_core::{Board, Color, Coord, Piece, PieceKind};
use thiserror::Error;

use crate::movegen::candidate_moves;

/// Why a move was not applied. The game is left untouched in every case.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Coord),

    #[error("the piece on {from} belongs to {owner}, but it is {turn}'s turn")]
    WrongTurn {
        from: Coord,
        owner: Color,
        turn: Color,
    },

    #[error("a piece cannot move onto its own square {0}")]
    SameSquare(Coord),

    #[error("game has already ended")]
    GameAlreadyOver,
}

/// What an applied move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was played and the turn passed to the other side.
    Continued,
    /// The move captured a king; the game is over.
    KingCaptured { winner: Color },
}

impl MoveOutcome {
    /// Returns true if this move ended the game.
    pub const fn game_ended(self) -> bool {
        matches!(self, MoveOutcome::KingCaptured { .. })
    }
}

/// A recorded move in game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub from: Coord,
    pub to: Coord,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

/// A duel in progress (or finished).
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current_turn: Color,
    winner: Option<Color>,
    moves: Vec<PlayedMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a game from an arbitrary board.
    pub fn from_board(board: Board, current_turn: Color) -> Self {
        Game {
            board,
            current_turn,
            winner: None,
            moves: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move. Frozen once the game is over.
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    /// The side that captured the opposing king, if any.
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn move_history(&self) -> &[PlayedMove] {
        &self.moves
    }

    /// Number of half-moves played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Destination candidates for the piece on `from`, see [`candidate_moves`].
    pub fn candidate_moves(&self, from: Coord) -> Vec<Coord> {
        candidate_moves(&self.board, from)
    }

    /// Plays `from` → `to`, capturing whatever stands on `to`.
    ///
    /// Only ownership is checked here: the source must hold a piece of the
    /// side to move and the destination must differ from it. Whether `to` is a candidate of `from` is the caller's
    /// business.
    pub fn apply_move(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameAlreadyOver);
        }

        let piece = self.board.get(from).ok_or(MoveError::EmptySquare(from))?;
        if piece.color != self.current_turn {
            return Err(MoveError::WrongTurn {
                from,
                owner: piece.color,
                turn: self.current_turn,
            });
        }
        if from == to {
            return Err(MoveError::SameSquare(from));
        }

        self.board.remove(from);
        let captured = self.board.put(to, piece);
        self.moves.push(PlayedMove {
            from,
            to,
            piece,
            captured,
        });

        if captured.is_some_and(|p| p.kind == PieceKind::King) {
            self.winner = Some(piece.color);
            return Ok(MoveOutcome::KingCaptured {
                winner: piece.color,
            });
        }

        self.current_turn = self.current_turn.opposite();
        Ok(MoveOutcome::Continued)
    }
}
