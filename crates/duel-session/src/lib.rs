//! Session management for chess duels.
//!
//! A [`Session`] owns the two seats (white and black) and at most one
//! [`Game`](duel_engine::Game). The transport feeds it [`Event`]s one at a
//! time and delivers the [`Dispatch`]es it returns; the session itself does
//! no I/O, which keeps every transition testable without a network.
//!
//! Lifecycle:
//!
//! ```text
//! Empty --connect--> AwaitingOpponent --connect--> InProgress --king captured--> Finished
//!   ^                      |    ^                      |                            |
//!   +------disconnect------+    +------disconnect------+----------------------------+
//! ```
//!
//! A third connection while both seats are taken is turned away with an
//! error and a close frame.

mod error;
mod session;

pub use error::SessionError;
pub use session::{Dispatch, Event, ParticipantId, Session, SessionOptions, SessionStatus};
