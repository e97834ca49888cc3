use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use copypanda_events::RunSnapshot;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::watch;

use crate::error::AppResult;
use crate::handlers::runs::TokenParams;
use crate::state::AppState;

/// Interval between Ping frames while a run is in progress (in seconds).
const PING_INTERVAL_SECS: u64 = 30;

/// HTTP handler that upgrades the connection to a run status stream.
///
/// The token is checked before the upgrade so a bad token gets a plain
/// 401/404 JSON response instead of a socket.
pub async fn run_stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    Query(params): Query<TokenParams>,
) -> AppResult<impl IntoResponse> {
    let rx = state.registry.attach(&run_id, &params.token).await?;
    Ok(ws.on_upgrade(move |socket| stream_snapshots(socket, run_id, rx)))
}

/// Send the current snapshot, then every change, until the run finishes.
///
/// The terminal snapshot is always sent before the socket is closed.
async fn stream_snapshots(socket: WebSocket, run_id: String, mut rx: watch::Receiver<RunSnapshot>) {
    tracing::info!(run_id = %run_id, "Run stream connected");
    let (mut sink, mut stream) = socket.split();

    let mut ping = tokio::time::interval(Duration::from_secs(PING_INTERVAL_SECS));
    ping.tick().await;

    let mut current = rx.borrow_and_update().clone();
    if send_snapshot(&mut sink, &current).await.is_err() {
        return;
    }

    while !current.is_terminal() {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::debug!(run_id = %run_id, "Run channel closed");
                    break;
                }
                current = rx.borrow_and_update().clone();
                if send_snapshot(&mut sink, &current).await.is_err() {
                    return;
                }
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Default::default())).await.is_err() {
                    return;
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(run_id = %run_id, "Run stream closed by client");
                    return;
                }
                Some(Err(e)) => {
                    tracing::debug!(run_id = %run_id, error = %e, "WebSocket receive error");
                    return;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    let _ = sink.send(Message::Close(None)).await;
    tracing::info!(run_id = %run_id, state = ?current.state, "Run stream finished");
}

async fn send_snapshot(
    sink: &mut SplitSink<WebSocket, Message>,
    snapshot: &RunSnapshot,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(snapshot) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize run snapshot");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}
