//! WebSocket handlers: viewer fan-out and publisher ingest.
//!
//! DESIGN
//! ======
//! Viewers subscribe to the state's `watch` slot. Each connection runs one
//! `select!` loop over three sources:
//! - inbound client text → reply with the latest message
//! - `watch` change notifications → mark the connection dirty
//! - a push interval tick → send the latest message if dirty
//!
//! Publishes that land between two ticks collapse into one push of the newest
//! message, so a fast publisher never queues work on a slow viewer.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send the latest message (if any)
//! 2. Publishes → coalesced pushes, at most one per push interval
//! 3. Close or send failure → subscription dropped

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};
use uuid::Uuid;

use crate::routes::radar::TokenQuery;
use crate::services::relay;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

/// `GET /ws`
pub async fn handle_viewer(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_viewer(socket, state))
}

/// `GET /ws/publish?token=`
pub async fn handle_publisher(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    if let Err(e) = relay::authorize(&state.config, query.token.as_deref()) {
        return (StatusCode::UNAUTHORIZED, e.to_string()).into_response();
    }
    ws.on_upgrade(move |socket| run_publisher(socket, state))
}

// =============================================================================
// VIEWER
// =============================================================================

async fn run_viewer(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let mut rx = state.subscribe();

    let current = rx.borrow_and_update().clone();
    if let Some(published) = current {
        if send_text(&mut socket, &published.raw).await.is_err() {
            return;
        }
    }

    info!(%client_id, viewers = state.viewer_count(), "ws: viewer connected");

    let mut tick = interval(state.config.push_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut dirty = false;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(_) => {
                        if send_text(&mut socket, &relay::latest_or_idle(&state)).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                dirty = true;
            }
            _ = tick.tick(), if dirty => {
                dirty = false;
                let latest = rx.borrow_and_update().clone();
                if let Some(published) = latest {
                    if send_text(&mut socket, &published.raw).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    info!(%client_id, "ws: viewer disconnected");
}

// =============================================================================
// PUBLISHER
// =============================================================================

async fn run_publisher(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    info!(%client_id, "ws: publisher connected");

    let mut accepted = 0_u64;
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => match relay::publish(&state, text.as_str()) {
                Ok(_) => accepted += 1,
                Err(e) => {
                    warn!(%client_id, error = %e, "ws: publish rejected");
                    if send_text(&mut socket, &relay::error_message(&e.to_string())).await.is_err() {
                        break;
                    }
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!(%client_id, accepted, "ws: publisher disconnected");
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_text(socket: &mut WebSocket, text: &str) -> Result<(), axum::Error> {
    socket.send(Message::Text(text.to_owned().into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
