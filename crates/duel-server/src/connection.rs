//! One WebSocket connection: decode requests for the hub, write its replies.

use std::net::SocketAddr;

use duel_protocol::ServerMessage;
use duel_session::ParticipantId;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::hub::{HubClosed, HubHandle, Outgoing};

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error(transparent)]
    Hub(#[from] HubClosed),
}

pub async fn serve(
    stream: TcpStream,
    peer: SocketAddr,
    id: ParticipantId,
    hub: HubHandle,
) -> Result<(), ConnectionError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!(%peer, participant = %id, "connection opened");
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<Outgoing>();
    hub.join(id, outbox).await?;

    // Forward hub output to the socket.
    let writer = tokio::spawn(async move {
        while let Some(outgoing) = outbox_rx.recv().await {
            let frame = match outgoing {
                Outgoing::Message(message) => match duel_protocol::encode(&message) {
                    Ok(text) => Message::Text(text.into()),
                    Err(e) => {
                        warn!(participant = %id, error = %e, "failed to encode message");
                        continue;
                    }
                },
                Outgoing::Close { code, reason } => Message::Close(Some(CloseFrame {
                    code: CloseCode::from(code),
                    reason: reason.into(),
                })),
            };
            let closing = matches!(frame, Message::Close(_));
            if ws_sender.send(frame).await.is_err() || closing {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(participant = %id, error = %e, "read failed");
                break;
            }
        };

        match duel_protocol::decode_client(&text) {
            Ok(request) => hub.message(id, request).await?,
            Err(e) => {
                warn!(participant = %id, error = %e, "malformed message");
                hub.reply(id, ServerMessage::error("Invalid message format."))
                    .await?;
            }
        }
    }

    hub.leave(id).await?;
    writer.abort();
    info!(%peer, participant = %id, "connection closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub;
    use duel_protocol::ClientMessage;
    use duel_session::Session;
    use tokio::net::TcpListener;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn start_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (hub, _task) = hub::spawn(Session::default());
        tokio::spawn(async move {
            let mut next_id = 0;
            while let Ok((stream, peer)) = listener.accept().await {
                next_id += 1;
                tokio::spawn(serve(stream, peer, ParticipantId(next_id), hub.clone()));
            }
        });
        addr
    }

    async fn connect(addr: SocketAddr) -> Client {
        let (client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
        client
    }

    async fn next_message(client: &mut Client) -> ServerMessage {
        match client.next().await {
            Some(Ok(Message::Text(text))) => duel_protocol::decode_server(&text).unwrap(),
            other => panic!("Expected a text frame, got {:?}", other),
        }
    }

    async fn send(client: &mut Client, request: &ClientMessage) {
        let text = duel_protocol::encode(request).unwrap();
        client.send(Message::Text(text.into())).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_json_is_reported_and_the_connection_stays_open() {
        let addr = start_server().await;
        let mut white = connect(addr).await;
        assert_eq!(
            next_message(&mut white).await,
            ServerMessage::info("Waiting for an opponent...")
        );

        white.send(Message::Text("not json".into())).await.unwrap();
        assert_eq!(
            next_message(&mut white).await,
            ServerMessage::error("Invalid message format.")
        );

        let mut black = connect(addr).await;
        assert!(matches!(
            next_message(&mut black).await,
            ServerMessage::GameStart { .. }
        ));
        assert!(matches!(
            next_message(&mut white).await,
            ServerMessage::GameStart { .. }
        ));
        assert!(matches!(
            next_message(&mut white).await,
            ServerMessage::YourTurn { .. }
        ));

        send(&mut white, &ClientMessage::SelectPiece { row: 6, col: 4 }).await;
        match next_message(&mut white).await {
            ServerMessage::PossibleMoves { moves } => assert_eq!(moves.len(), 2),
            other => panic!("Expected possible_moves, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn third_client_is_told_and_closed_with_policy() {
        let addr = start_server().await;
        let mut white = connect(addr).await;
        next_message(&mut white).await;
        let mut black = connect(addr).await;
        next_message(&mut black).await;

        let mut third = connect(addr).await;
        assert_eq!(
            next_message(&mut third).await,
            ServerMessage::error("The game is currently full. Please try again later.")
        );
        match third.next().await {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(frame.code, CloseCode::Policy);
                assert_eq!(frame.reason, "Game is full");
            }
            other => panic!("Expected a close frame, got {:?}", other),
        }
    }
}
