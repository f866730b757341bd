//! The single task that owns the session.
//!
//! Connections never touch the [`Session`] directly: they post events to the
//! hub, which applies them one at a time and routes the resulting messages to
//! per-connection outboxes. This keeps every game transition serialized
//! without a lock.

use std::collections::HashMap;

use duel_protocol::{ClientMessage, ServerMessage};
use duel_session::{Dispatch, Event, ParticipantId, Session};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Error, Debug)]
#[error("session hub has shut down")]
pub struct HubClosed;

/// What a connection's writer task should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Message(ServerMessage),
    Close { code: u16, reason: String },
}

pub type Outbox = mpsc::UnboundedSender<Outgoing>;

#[derive(Debug)]
enum Inbound {
    Joined { id: ParticipantId, outbox: Outbox },
    Event(Event),
    /// A transport-level reply that bypasses the session.
    Reply { id: ParticipantId, message: ServerMessage },
}

/// Cloneable handle connections use to talk to the hub.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<Inbound>,
}

impl HubHandle {
    /// Registers a connection's outbox and seats it if a seat is free.
    pub async fn join(&self, id: ParticipantId, outbox: Outbox) -> Result<(), HubClosed> {
        self.post(Inbound::Joined { id, outbox }).await
    }

    pub async fn message(&self, id: ParticipantId, message: ClientMessage) -> Result<(), HubClosed> {
        self.post(Inbound::Event(Event::Message(id, message))).await
    }

    /// Queues a message for one connection behind everything posted before it.
    pub async fn reply(&self, id: ParticipantId, message: ServerMessage) -> Result<(), HubClosed> {
        self.post(Inbound::Reply { id, message }).await
    }

    pub async fn leave(&self, id: ParticipantId) -> Result<(), HubClosed> {
        self.post(Inbound::Event(Event::Disconnected(id))).await
    }

    async fn post(&self, inbound: Inbound) -> Result<(), HubClosed> {
        self.tx.send(inbound).await.map_err(|_| HubClosed)
    }
}

/// Starts the hub. The task ends, returning the session, once every handle is dropped.
pub fn spawn(session: Session) -> (HubHandle, JoinHandle<Session>) {
    let (tx, rx) = mpsc::channel(100);
    let task = tokio::spawn(run(session, rx));
    (HubHandle { tx }, task)
}

async fn run(mut session: Session, mut rx: mpsc::Receiver<Inbound>) -> Session {
    let mut outboxes: HashMap<ParticipantId, Outbox> = HashMap::new();

    while let Some(inbound) = rx.recv().await {
        let event = match inbound {
            Inbound::Joined { id, outbox } => {
                outboxes.insert(id, outbox);
                Event::Connected(id)
            }
            Inbound::Event(event) => event,
            Inbound::Reply { id, message } => {
                route(&outboxes, Dispatch::Send { to: id, message });
                continue;
            }
        };
        let departed = match &event {
            Event::Disconnected(id) => Some(*id),
            _ => None,
        };

        for dispatch in session.apply(event) {
            route(&outboxes, dispatch);
        }

        if let Some(id) = departed {
            outboxes.remove(&id);
        }
    }

    session
}

fn route(outboxes: &HashMap<ParticipantId, Outbox>, dispatch: Dispatch) {
    let (to, outgoing) = match dispatch {
        Dispatch::Send { to, message } => (to, Outgoing::Message(message)),
        Dispatch::Close { to, code, reason } => (to, Outgoing::Close { code, reason }),
    };
    match outboxes.get(&to) {
        Some(outbox) => {
            if outbox.send(outgoing).is_err() {
                debug!(participant = %to, "outbox closed, dropping message");
            }
        }
        None => debug!(participant = %to, "no outbox registered"),
    }
}
