//! Board and move engine for chess duels.
//!
//! This crate provides:
//! - [`candidate_moves`] - destination squares for the piece on a square
//! - [`Game`] - authoritative board, side to move, result and move history
//!
//! The rules are deliberately simplified: there is no check detection,
//! castling, en passant or promotion, and a game ends when a king is
//! captured.
//!
//! # Example
//!
//! ```
//! use duel_core::Coord;
//! use duel_engine::{Game, MoveOutcome};
//!
//! let mut game = Game::new();
//! let e2 = Coord::from_algebraic("e2").unwrap();
//! let e4 = Coord::from_algebraic("e4").unwrap();
//! assert!(game.candidate_moves(e2).contains(&e4));
//! assert_eq!(game.apply_move(e2, e4), Ok(MoveOutcome::Continued));
//! ```

mod game;
pub mod movegen;

pub use game::{Game, MoveError, MoveOutcome, PlayedMove};
pub use movegen::candidate_moves;
