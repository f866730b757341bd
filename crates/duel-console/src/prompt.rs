//! Console state machine: turns server messages and typed lines into output
//! and requests. No I/O happens here.

use duel_core::{Board, Coord};
use duel_protocol::{Candidate, ClientMessage, ServerMessage, SquareRef};

const PICK_PIECE: &str = "Select a piece to move (e.g., e2):";
const PICK_MOVE: &str = "Select a move by entering its number:";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    /// Not our turn.
    Idle,
    /// Waiting for the user to name a square.
    PickPiece,
    /// `select_piece` sent, waiting for candidates.
    Selecting { from: Coord },
    /// Candidates listed, waiting for a number.
    PickMove { from: Coord, moves: Vec<Candidate> },
    /// Move sent; an error sends us back to `PickPiece`.
    Submitted,
    Over,
}

/// What the console should print and, possibly, send.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub lines: Vec<String>,
    pub request: Option<ClientMessage>,
}

impl Reaction {
    fn say(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    fn show(self, board: &Board) -> Self {
        self.say(format!("\nCurrent Board:\n{}\n", board.render()))
    }

    fn send(mut self, request: ClientMessage) -> Self {
        self.request = Some(request);
        self
    }
}

#[derive(Debug)]
pub struct Prompt {
    phase: Phase,
}

impl Default for Prompt {
    fn default() -> Self {
        Prompt { phase: Phase::Idle }
    }
}

impl Prompt {
    pub fn on_server(&mut self, message: ServerMessage) -> Reaction {
        let out = Reaction::default();
        match message {
            ServerMessage::Info { message } => out.say(message),
            ServerMessage::GameStart { board, message, .. } => {
                self.phase = Phase::Idle;
                out.say(message).show(&board)
            }
            ServerMessage::YourTurn { board, message } => {
                self.phase = Phase::PickPiece;
                out.say(message).show(&board).say(PICK_PIECE)
            }
            ServerMessage::PossibleMoves { moves } => {
                let Phase::Selecting { from } = self.phase else {
                    return out;
                };
                if moves.is_empty() {
                    self.phase = Phase::PickPiece;
                    return out
                        .say("No valid moves for this piece. Try another piece.")
                        .say(PICK_PIECE);
                }
                let mut out = out.say("Possible moves:");
                for m in &moves {
                    let name = m.coord().map_or_else(|| "??".to_string(), |c| c.to_algebraic());
                    out = out.say(format!("{}: {}", m.index, name));
                }
                self.phase = Phase::PickMove { from, moves };
                out.say(PICK_MOVE)
            }
            ServerMessage::GameOver { board, message, .. } => {
                self.phase = Phase::Over;
                out.say(message).show(&board)
            }
            ServerMessage::Error { message } => {
                let out = out.say(format!("Error: {}", message));
                match self.phase {
                    Phase::Selecting { .. } | Phase::Submitted => {
                        self.phase = Phase::PickPiece;
                        out.say("Please try again.").say(PICK_PIECE)
                    }
                    _ => out,
                }
            }
        }
    }

    pub fn on_input(&mut self, line: &str) -> Reaction {
        let line = line.trim();
        let out = Reaction::default();
        match &self.phase {
            Phase::PickPiece => match Coord::from_algebraic(line) {
                Ok(from) => {
                    self.phase = Phase::Selecting { from };
                    out.send(ClientMessage::SelectPiece {
                        row: from.row() as i64,
                        col: from.col() as i64,
                    })
                }
                Err(_) => out.say("Invalid input. Try again.").say(PICK_PIECE),
            },
            Phase::PickMove { from, moves } => {
                let chosen = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| moves.iter().find(|m| m.index == n))
                    .and_then(Candidate::coord);
                match chosen {
                    Some(to) => {
                        let request = ClientMessage::Move {
                            from: SquareRef::from(*from),
                            to: SquareRef::from(to),
                        };
                        self.phase = Phase::Submitted;
                        out.send(request)
                    }
                    None => out.say("Invalid move selection.").say(PICK_MOVE),
                }
            }
            Phase::Over => out.say("The game is over."),
            Phase::Idle | Phase::Selecting { .. } | Phase::Submitted => {
                out.say("Please wait for your turn.")
            }
        }
    }
}
