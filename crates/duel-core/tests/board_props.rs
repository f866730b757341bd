//! Property tests for board encodings.

use duel_core::{Board, Color, Coord, Piece, PieceKind};
use proptest::prelude::*;

fn piece() -> impl Strategy<Value = Piece> {
    (0..PieceKind::ALL.len(), any::<bool>()).prop_map(|(kind, white)| {
        let color = if white { Color::White } else { Color::Black };
        Piece::new(PieceKind::ALL[kind], color)
    })
}

fn board() -> impl Strategy<Value = Board> {
    prop::collection::vec(prop::option::weighted(0.4, piece()), 64).prop_map(|squares| {
        let mut board = Board::empty();
        for (at, square) in Coord::all().zip(squares) {
            if let Some(p) = square {
                board.put(at, p);
            }
        }
        board
    })
}

proptest! {
    #[test]
    fn placement_survives_a_reparse(board in board()) {
        let placement = board.to_placement();
        prop_assert_eq!(placement.split('/').count(), 8);
        prop_assert_eq!(Board::from_placement(&placement).unwrap(), board);
    }

    #[test]
    fn wire_grid_survives_a_reparse(board in board()) {
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, board);
    }

    #[test]
    fn wire_cells_match_piece_letters(board in board()) {
        let grid = serde_json::to_value(&board).unwrap();
        for at in Coord::all() {
            let cell = grid[at.row() as usize][at.col() as usize].as_str().unwrap().to_string();
            let expected = board.get(at).map(|p| p.to_char().to_string()).unwrap_or_default();
            prop_assert_eq!(cell, expected);
        }
    }

    #[test]
    fn render_shows_every_piece(board in board()) {
        let text = board.render();
        let lines: Vec<&str> = text.lines().collect();
        prop_assert_eq!(lines.len(), 9);
        for at in Coord::all() {
            let shown = lines[at.row() as usize]
                .split(' ')
                .nth(at.col() as usize + 1)
                .and_then(|s| s.chars().next());
            let expected = board.get(at).map_or('.', Piece::to_char);
            prop_assert_eq!(shown, Some(expected));
        }
    }
}
