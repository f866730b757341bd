//! Board coordinates.

use std::fmt;
use thiserror::Error;

/// Errors produced when building a [`Coord`] from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordError {
    #[error("square ({row}, {col}) is off the board")]
    OutOfRange { row: i64, col: i64 },

    #[error("invalid square notation '{0}'")]
    InvalidNotation(String),
}

/// A square on the 8×8 board, addressed by row and column.
///
/// Row 0 is rank 8 (Black's back rank), row 7 is rank 1; column 0 is file `a`.
/// A `Coord` is always on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Creates a coordinate, or `None` if it is off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Coord { row, col })
        } else {
            None
        }
    }

    /// Validates coordinates received from the outside world.
    pub fn try_from_signed(row: i64, col: i64) -> Result<Self, CoordError> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Ok(Coord {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(CoordError::OutOfRange { row, col })
        }
    }

    /// Parses algebraic notation such as `"e2"` (`col = letter - 'a'`, `row = 8 - digit`).
    pub fn from_algebraic(s: &str) -> Result<Self, CoordError> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(CoordError::InvalidNotation(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(CoordError::InvalidNotation(s.to_string()));
        }
        Ok(Coord {
            row: 8 - (rank - b'0'),
            col: file - b'a',
        })
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the square `(row + dr, col + dc)` if it is still on the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Coord {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }

    /// Iterates over all 64 squares, row by row from row 0.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Coord { row, col }))
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {} = {})", self.row, self.col, self.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_off_board() {
        assert!(Coord::new(7, 7).is_some());
        assert!(Coord::new(8, 0).is_none());
        assert!(Coord::new(0, 8).is_none());
    }

    #[test]
    fn try_from_signed() {
        assert_eq!(Coord::try_from_signed(6, 4), Ok(Coord { row: 6, col: 4 }));
        assert_eq!(
            Coord::try_from_signed(-1, 0),
            Err(CoordError::OutOfRange { row: -1, col: 0 })
        );
        assert!(Coord::try_from_signed(3, 8).is_err());
    }

    #[test]
    fn algebraic_maps_rank_to_row() {
        let e2 = Coord::from_algebraic("e2").unwrap();
        assert_eq!((e2.row(), e2.col()), (6, 4));
        let a8 = Coord::from_algebraic("a8").unwrap();
        assert_eq!((a8.row(), a8.col()), (0, 0));
        let h1 = Coord::from_algebraic("H1").unwrap();
        assert_eq!((h1.row(), h1.col()), (7, 7));
        assert_eq!(e2.to_algebraic(), "e2");
    }

    #[test]
    fn algebraic_rejects_garbage() {
        for s in ["", "e", "e9", "i2", "e22", "2e"] {
            assert!(Coord::from_algebraic(s).is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn offset_stays_on_board() {
        let a8 = Coord::new(0, 0).unwrap();
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(0, -1), None);
        assert_eq!(a8.offset(2, 1), Coord::new(2, 1));
        let h1 = Coord::new(7, 7).unwrap();
        assert_eq!(h1.offset(1, 1), None);
    }

    #[test]
    fn all_covers_the_board() {
        assert_eq!(Coord::all().count(), 64);
        assert_eq!(Coord::all().next(), Coord::new(0, 0));
    }
}
