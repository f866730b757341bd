//! Seat assignment, request handling and game lifecycle.

use std::fmt;

use duel_core::{Color, Coord};
use duel_engine::{Game, MoveOutcome};
use duel_protocol::{Candidate, ClientMessage, ServerMessage, SquareRef, CLOSE_GAME_FULL};
use tracing::{debug, info, warn};

use crate::SessionError;

/// Opaque handle the transport assigns to each connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something that happened on the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connected(ParticipantId),
    Message(ParticipantId, ClientMessage),
    Disconnected(ParticipantId),
}

/// Work for the transport produced by a session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Send {
        to: ParticipantId,
        message: ServerMessage,
    },
    /// Close the connection after sending everything queued before it.
    Close {
        to: ParticipantId,
        code: u16,
        reason: String,
    },
}

/// Coarse state of the single game slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Empty,
    AwaitingOpponent,
    InProgress,
    Finished,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Only accept a move whose source was the last selected square and whose
    /// destination was among the candidates returned for it.
    pub require_selection: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            require_selection: true,
        }
    }
}

/// The last square a seat selected and the candidates it was shown.
#[derive(Debug, Clone)]
struct PendingSelection {
    from: Coord,
    candidates: Vec<Coord>,
}

#[derive(Debug, Clone)]
struct Seat {
    participant: ParticipantId,
    pending: Option<PendingSelection>,
}

/// Two seats and at most one game.
///
/// Invariant: `game` is `Some` only while both seats are occupied.
#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    seats: [Option<Seat>; 2],
    game: Option<Game>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Session {
            options,
            seats: [None, None],
            game: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match &self.game {
            Some(game) if game.is_game_over() => SessionStatus::Finished,
            Some(_) => SessionStatus::InProgress,
            None if self.occupancy() == 0 => SessionStatus::Empty,
            None => SessionStatus::AwaitingOpponent,
        }
    }

    /// Number of occupied seats.
    pub fn occupancy(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// The participant sitting in `color`'s seat.
    pub fn occupant(&self, color: Color) -> Option<ParticipantId> {
        self.seats[color.index()].as_ref().map(|s| s.participant)
    }

    /// The seat a participant occupies, if any.
    pub fn seat_of(&self, id: ParticipantId) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| self.occupant(*c) == Some(id))
    }

    /// Applies one transport event.
    pub fn apply(&mut self, event: Event) -> Vec<Dispatch> {
        match event {
            Event::Connected(id) => self.connect(id),
            Event::Message(id, message) => self.handle(id, message),
            Event::Disconnected(id) => self.disconnect(id),
        }
    }

    /// Seats a new connection, starting the game when the second seat fills.
    pub fn connect(&mut self, id: ParticipantId) -> Vec<Dispatch> {
        let Some(color) = Color::ALL
            .into_iter()
            .find(|c| self.seats[c.index()].is_none())
        else {
            warn!(participant = %id, "both seats taken, turning connection away");
            return vec![
                send(
                    id,
                    ServerMessage::error("The game is currently full. Please try again later."),
                ),
                Dispatch::Close {
                    to: id,
                    code: CLOSE_GAME_FULL,
                    reason: "Game is full".to_string(),
                },
            ];
        };

        self.seats[color.index()] = Some(Seat {
            participant: id,
            pending: None,
        });
        info!(participant = %id, %color, "participant seated");

        match (self.occupant(Color::White), self.occupant(Color::Black)) {
            (Some(white), Some(black)) => self.start_game(white, black),
            _ => vec![send(id, ServerMessage::info("Waiting for an opponent..."))],
        }
    }

    /// Frees the seat of a departing participant and discards its game.
    pub fn disconnect(&mut self, id: ParticipantId) -> Vec<Dispatch> {
        let Some(color) = self.seat_of(id) else {
            debug!(participant = %id, "unseated connection closed");
            return Vec::new();
        };

        self.seats[color.index()] = None;
        info!(participant = %id, %color, "participant left, seat freed");

        let mut out = Vec::new();
        if let Some(game) = self.game.take() {
            info!(plies = game.ply_count(), "game discarded");
            if let Some(seat) = self.seats[color.opposite().index()].as_mut() {
                seat.pending = None;
                out.push(send(
                    seat.participant,
                    ServerMessage::info("Your opponent disconnected. Waiting for an opponent..."),
                ));
            }
        }
        out
    }

    /// Handles a request, answering rejections with an `error` message.
    pub fn handle(&mut self, id: ParticipantId, message: ClientMessage) -> Vec<Dispatch> {
        debug!(participant = %id, ?message, "request");
        match self.try_handle(id, message) {
            Ok(out) => out,
            Err(e) => {
                warn!(participant = %id, error = ?e, "request rejected");
                vec![send(id, ServerMessage::error(e.to_string()))]
            }
        }
    }

    fn try_handle(
        &mut self,
        id: ParticipantId,
        message: ClientMessage,
    ) -> Result<Vec<Dispatch>, SessionError> {
        let color = self.seat_of(id).ok_or(SessionError::NotSeated)?;
        match self.status() {
            SessionStatus::InProgress => {}
            SessionStatus::Finished => return Err(SessionError::GameOver),
            SessionStatus::Empty | SessionStatus::AwaitingOpponent => {
                return Err(SessionError::NotStarted)
            }
        }

        match message {
            ClientMessage::SelectPiece { row, col } => self.select_piece(id, color, row, col),
            ClientMessage::Move { from, to } => self.submit_move(color, from, to),
        }
    }

    fn select_piece(
        &mut self,
        id: ParticipantId,
        color: Color,
        row: i64,
        col: i64,
    ) -> Result<Vec<Dispatch>, SessionError> {
        let seat = self.seats[color.index()]
            .as_mut()
            .ok_or(SessionError::NotSeated)?;
        seat.pending = None;

        let from = Coord::try_from_signed(row, col)?;
        let game = self.game.as_ref().ok_or(SessionError::NotStarted)?;
        let candidates = game.candidate_moves(from);
        debug!(%color, %from, count = candidates.len(), "candidates generated");

        let reply = ServerMessage::PossibleMoves {
            moves: Candidate::numbered(&candidates),
        };
        if !candidates.is_empty() {
            seat.pending = Some(PendingSelection { from, candidates });
        }
        Ok(vec![send(id, reply)])
    }

    fn submit_move(
        &mut self,
        color: Color,
        from: SquareRef,
        to: SquareRef,
    ) -> Result<Vec<Dispatch>, SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NotStarted)?;
        if game.current_turn() != color {
            return Err(SessionError::NotYourTurn);
        }

        let pending = self.seats[color.index()]
            .as_mut()
            .and_then(|s| s.pending.take());
        let (from, to) = (from.to_coord()?, to.to_coord()?);
        if self.options.require_selection {
            let selected = pending
                .as_ref()
                .is_some_and(|p| p.from == from && p.candidates.contains(&to));
            if !selected {
                return Err(SessionError::NotACandidate);
            }
        }

        let outcome = game.apply_move(from, to)?;
        info!(%color, %from, %to, "move applied");

        let board = game.board().clone();
        match outcome {
            MoveOutcome::Continued => {
                let next = game.current_turn();
                Ok(self
                    .occupant(next)
                    .map(|p| {
                        send(
                            p,
                            ServerMessage::YourTurn {
                                board,
                                message: "It's your turn!".to_string(),
                            },
                        )
                    })
                    .into_iter()
                    .collect())
            }
            MoveOutcome::KingCaptured { winner } => {
                info!(%winner, "king captured, game over");
                let message = format!(
                    "Game over: {} captured the {} king.",
                    winner,
                    winner.opposite()
                );
                Ok(Color::ALL
                    .into_iter()
                    .filter_map(|c| self.occupant(c))
                    .map(|p| {
                        send(
                            p,
                            ServerMessage::GameOver {
                                winner,
                                board: board.clone(),
                                message: message.clone(),
                            },
                        )
                    })
                    .collect())
            }
        }
    }

    fn start_game(&mut self, white: ParticipantId, black: ParticipantId) -> Vec<Dispatch> {
        let game = Game::new();
        let board = game.board().clone();
        self.game = Some(game);
        info!(%white, %black, "game started");

        vec![
            send(
                white,
                ServerMessage::GameStart {
                    color: Color::White,
                    board: board.clone(),
                    message: "Game started! You are white.".to_string(),
                },
            ),
            send(
                black,
                ServerMessage::GameStart {
                    color: Color::Black,
                    board: board.clone(),
                    message: "Game started! You are black.".to_string(),
                },
            ),
            send(
                white,
                ServerMessage::YourTurn {
                    board,
                    message: "It's your turn!".to_string(),
                },
            ),
        ]
    }
}

fn send(to: ParticipantId, message: ServerMessage) -> Dispatch {
    Dispatch::Send { to, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ParticipantId = ParticipantId(1);
    const B: ParticipantId = ParticipantId(2);
    const C: ParticipantId = ParticipantId(3);

    #[test]
    fn first_connection_waits() {
        let mut session = Session::default();
        assert_eq!(session.status(), SessionStatus::Empty);
        let out = session.connect(A);
        assert_eq!(
            out,
            vec![send(A, ServerMessage::info("Waiting for an opponent..."))]
        );
        assert_eq!(session.status(), SessionStatus::AwaitingOpponent);
        assert_eq!(session.seat_of(A), Some(Color::White));
    }

    #[test]
    fn second_connection_starts_the_game() {
        let mut session = Session::default();
        session.connect(A);
        let out = session.connect(B);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.seat_of(B), Some(Color::Black));
        assert_eq!(out.len(), 3);
        assert!(matches!(
            &out[0],
            Dispatch::Send { to, message: ServerMessage::GameStart { color: Color::White, .. } } if *to == A
        ));
        assert!(matches!(
            &out[1],
            Dispatch::Send { to, message: ServerMessage::GameStart { color: Color::Black, .. } } if *to == B
        ));
        assert!(matches!(
            &out[2],
            Dispatch::Send { to, message: ServerMessage::YourTurn { .. } } if *to == A
        ));
    }

    #[test]
    fn third_connection_is_turned_away() {
        let mut session = Session::default();
        session.connect(A);
        session.connect(B);
        let out = session.connect(C);
        assert!(matches!(&out[0], Dispatch::Send { to, message: ServerMessage::Error { .. } } if *to == C));
        assert_eq!(
            out[1],
            Dispatch::Close {
                to: C,
                code: 1008,
                reason: "Game is full".to_string()
            }
        );
        // The rejected connection leaving changes nothing.
        assert!(session.disconnect(C).is_empty());
        assert_eq!(session.occupancy(), 2);
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn requests_before_the_game_starts_are_rejected() {
        let mut session = Session::default();
        session.connect(A);
        let out = session.handle(A, ClientMessage::SelectPiece { row: 6, col: 4 });
        assert_eq!(
            out,
            vec![send(A, ServerMessage::error("The game has not started yet."))]
        );
    }

    #[test]
    fn strangers_cannot_play() {
        let mut session = Session::default();
        session.connect(A);
        session.connect(B);
        let out = session.handle(C, ClientMessage::SelectPiece { row: 6, col: 4 });
        assert_eq!(
            out,
            vec![send(C, ServerMessage::error("You do not have a seat in this game."))]
        );
    }

    #[test]
    fn disconnect_frees_the_seat_and_notifies_the_opponent() {
        let mut session = Session::default();
        session.connect(A);
        session.connect(B);
        let out = session.disconnect(A);
        assert_eq!(
            out,
            vec![send(
                B,
                ServerMessage::info("Your opponent disconnected. Waiting for an opponent...")
            )]
        );
        assert!(session.game().is_none());
        assert_eq!(session.status(), SessionStatus::AwaitingOpponent);
        assert_eq!(session.occupant(Color::White), None);

        // The next connection takes the vacant white seat and a fresh game starts.
        let out = session.connect(C);
        assert_eq!(session.seat_of(C), Some(Color::White));
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(out.len(), 3);
        assert_eq!(session.game().map(Game::ply_count), Some(0));
    }

    #[test]
    fn last_participant_leaving_empties_the_session() {
        let mut session = Session::default();
        session.connect(A);
        assert!(session.disconnect(A).is_empty());
        assert_eq!(session.status(), SessionStatus::Empty);
    }

    #[test]
    fn events_dispatch_to_handlers() {
        let mut session = Session::default();
        session.apply(Event::Connected(A));
        session.apply(Event::Connected(B));
        let out = session.apply(Event::Message(A, ClientMessage::SelectPiece { row: 7, col: 6 }));
        assert!(matches!(
            &out[0],
            Dispatch::Send { message: ServerMessage::PossibleMoves { moves }, .. } if moves.len() == 2
        ));
        session.apply(Event::Disconnected(B));
        assert_eq!(session.status(), SessionStatus::AwaitingOpponent);
    }
}
