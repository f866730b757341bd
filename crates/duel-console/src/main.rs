//! Terminal client for a chess duel.
//!
//! Connects to a duel server, prints every board it receives and asks for
//! moves in algebraic notation when it is this player's turn.

mod prompt;

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use prompt::Prompt;

#[derive(Parser, Debug)]
#[command(name = "duel-console", about = "Play a chess duel from the terminal")]
struct Args {
    /// Server address.
    #[arg(long, default_value = "ws://localhost:8080")]
    url: String,
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (ws_stream, _) = match connect_async(args.url.as_str()).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Could not connect to {}: {}", args.url, e);
            return Err(e.into());
        }
    };
    println!("Connected to the chess server.");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut prompt = Prompt::default();

    loop {
        let reaction = tokio::select! {
            frame = ws_receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => match duel_protocol::decode_server(&text) {
                    Ok(message) => prompt.on_server(message),
                    Err(e) => {
                        error!("Unreadable server message: {}", e);
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    if let Some(frame) = frame {
                        debug!(code = %frame.code, "Server closed: {}", frame.reason);
                    }
                    println!("Connection closed by server.");
                    break;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                None => {
                    println!("Connection closed by server.");
                    break;
                }
            },
            line = stdin.next_line() => match line? {
                Some(line) => prompt.on_input(&line),
                None => break,
            },
        };

        print_lines(&reaction.lines);
        if let Some(request) = reaction.request {
            let text = duel_protocol::encode(&request)?;
            ws_sender.send(Message::Text(text.into())).await?;
        }
    }

    let _ = ws_sender.close().await;
    Ok(())
}
