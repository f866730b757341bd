//! Candidate move generation.
//!
//! Candidates are produced in a fixed order: clients refer to them by their
//! 1-based position in the returned list, so the direction and offset tables
//! below are part of the protocol.

use duel_core::{Board, Color, Coord, PieceKind};

/// Rook rays: up, down, left, right (row, col deltas).
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Bishop rays.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Knight jumps.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// King steps: orthogonal first, then diagonal.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Returns the destination squares for the piece standing on `from`.
///
/// An empty square yields no candidates. Captures are always allowed,
/// including captures of the king; moving into an attacked square is not
/// prevented.
pub fn candidate_moves(board: &Board, from: Coord) -> Vec<Coord> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.color, &mut moves),
        PieceKind::Rook => slide(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Bishop => slide(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Queen => {
            slide(board, from, piece.color, &ROOK_DIRECTIONS, &mut moves);
            slide(board, from, piece.color, &BISHOP_DIRECTIONS, &mut moves);
        }
        PieceKind::Knight => leap(board, from, piece.color, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => leap(board, from, piece.color, &KING_OFFSETS, &mut moves),
    }
    moves
}

/// A square can be entered if it is empty or holds an enemy piece.
#[inline]
fn reachable(board: &Board, color: Color, at: Coord) -> bool {
    board.get(at).map_or(true, |p| p.color != color)
}

fn pawn_moves(board: &Board, from: Coord, color: Color, moves: &mut Vec<Coord>) {
    let dir = color.pawn_direction();

    if let Some(one) = from.offset(dir, 0).filter(|&to| board.is_empty(to)) {
        moves.push(one);
        if from.row() == color.pawn_row() {
            if let Some(two) = from.offset(2 * dir, 0).filter(|&to| board.is_empty(to)) {
                moves.push(two);
            }
        }
    }

    // Diagonals only ever capture.
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            if board.get(to).is_some_and(|p| p.color != color) {
                moves.push(to);
            }
        }
    }
}

fn slide(board: &Board, from: Coord, color: Color, dirs: &[(i8, i8)], moves: &mut Vec<Coord>) {
    for &(dr, dc) in dirs {
        let mut at = from;
        while let Some(next) = at.offset(dr, dc) {
            match board.get(next) {
                None => moves.push(next),
                Some(p) => {
                    if p.color != color {
                        moves.push(next);
                    }
                    break;
                }
            }
            at = next;
        }
    }
}

fn leap(board: &Board, from: Coord, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Coord>) {
    moves.extend(
        offsets
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| reachable(board, color, to)),
    );
}
