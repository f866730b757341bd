//! Request rejections.

use duel_core::CoordError;
use duel_engine::MoveError;
use thiserror::Error;

/// Why a request was rejected.
///
/// The display text is sent verbatim to the participant in an `error`
/// message; the session state is unchanged whenever one of these is returned.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("You do not have a seat in this game.")]
    NotSeated,

    #[error("The game has not started yet.")]
    NotStarted,

    #[error("The game is over.")]
    GameOver,

    #[error("It's not your turn.")]
    NotYourTurn,

    #[error("Invalid square.")]
    InvalidSquare(#[from] CoordError),

    /// The move does not match the last selection and its candidates.
    #[error("Invalid move.")]
    NotACandidate,

    /// The engine refused the move.
    #[error("Invalid move.")]
    Rejected(#[from] MoveError),
}
