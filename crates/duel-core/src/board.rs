//! 8×8 mailbox board.
//!
//! The board is stored row-major with row 0 being rank 8, matching the wire
//! format. Besides the grid itself this module owns the two text encodings
//! of a board:
//! - the wire grid: 8 rows of 8 strings (`"P"`, `"k"`, `""`, ...)
//! - FEN-style piece placement (`"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"`)

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{Color, Coord, Piece, PieceKind};

/// Errors produced when decoding a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("invalid board grid: {0}")]
    InvalidGrid(String),
}

/// An 8×8 board; each square is empty or holds one piece.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Piece placement of the standard starting position.
    pub const STANDARD_PLACEMENT: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Creates the standard starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(*kind, Color::Black));
            board.squares[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.squares[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.squares[7][col] = Some(Piece::new(*kind, Color::White));
        }
        board
    }

    /// Returns the piece on a square, if any.
    #[inline]
    pub fn get(&self, at: Coord) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize]
    }

    /// Returns true if the square holds no piece.
    #[inline]
    pub fn is_empty(&self, at: Coord) -> bool {
        self.get(at).is_none()
    }

    /// Puts a piece on a square, returning whatever stood there before.
    pub fn put(&mut self, at: Coord, piece: Piece) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize].replace(piece)
    }

    /// Empties a square, returning the piece that stood there.
    pub fn remove(&mut self, at: Coord) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize].take()
    }

    /// Iterates over all occupied squares, row by row from row 0.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(move |at| self.get(at).map(|p| (at, p)))
    }

    /// Parses FEN-style piece placement (ranks 8 to 1, separated by `/`).
    pub fn from_placement(placement: &str) -> Result<Self, BoardError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(BoardError::InvalidPlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                } else if let Some(piece) = Piece::from_char(c) {
                    if col < 8 {
                        board.squares[row][col] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(BoardError::InvalidPlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
            }
            if col != 8 {
                return Err(BoardError::InvalidPlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    col
                )));
            }
        }
        Ok(board)
    }

    /// Returns the FEN-style piece placement of this board.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for (row, squares) in self.squares.iter().enumerate() {
            if row > 0 {
                out.push('/');
            }
            let mut gap = 0;
            for square in squares {
                match square {
                    Some(piece) => {
                        if gap > 0 {
                            out.push_str(&gap.to_string());
                            gap = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                out.push_str(&gap.to_string());
            }
        }
        out
    }

    /// Builds a board from the wire grid: 8 rows of 8 cell strings.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, BoardError> {
        if rows.len() != 8 {
            return Err(BoardError::InvalidGrid(format!(
                "expected 8 rows, got {}",
                rows.len()
            )));
        }
        let mut board = Board::empty();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != 8 {
                return Err(BoardError::InvalidGrid(format!(
                    "row {} has {} cells, expected 8",
                    row,
                    cells.len()
                )));
            }
            for (col, cell) in cells.iter().enumerate() {
                let cell = cell.as_ref();
                let mut chars = cell.chars();
                board.squares[row][col] = match (chars.next(), chars.next()) {
                    (None, _) => None,
                    (Some(c), None) => Some(Piece::from_char(c).ok_or_else(|| {
                        BoardError::InvalidGrid(format!("unknown piece '{}'", cell))
                    })?),
                    _ => {
                        return Err(BoardError::InvalidGrid(format!(
                            "unknown piece '{}'",
                            cell
                        )))
                    }
                };
            }
        }
        Ok(board)
    }

    /// Renders the board for a terminal, rank 8 on top, empty squares as `.`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (row, squares) in self.squares.iter().enumerate() {
            out.push_str(&(8 - row).to_string());
            for square in squares {
                out.push(' ');
                out.push(square.map_or('.', Piece::to_char));
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h");
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Wire cell strings indexed by `[color][kind]`.
const CELLS: [[&str; 6]; 2] = [
    ["P", "N", "B", "R", "Q", "K"],
    ["p", "n", "b", "r", "q", "k"],
];

fn cell_str(square: Option<Piece>) -> &'static str {
    square.map_or("", |piece| CELLS[piece.color.index()][piece.kind as usize])
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.squares.iter().map(|row| (*row).map(cell_str)))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: Vec<Vec<String>> = Vec::deserialize(deserializer)?;
        Board::from_rows(&rows).map_err(D::Error::custom)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_placement())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
