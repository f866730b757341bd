//! Core types for chess duels.
//!
//! This crate provides the fundamental types shared by the engine, the
//! session layer and the wire protocol:
//! - [`Color`] and [`Piece`]/[`PieceKind`] for piece representation
//! - [`Coord`] for row/column board coordinates
//! - [`Board`], an 8×8 mailbox board with its wire and placement encodings
//!
//! Coordinates follow the wire convention: row 0 is the black back rank
//! (rank 8), row 7 the white back rank (rank 1), column 0 is file `a`.

mod board;
mod color;
mod coord;
mod piece;

pub use board::{Board, BoardError};
pub use color::Color;
pub use coord::{Coord, CoordError};
pub use piece::{Piece, PieceKind};
