//! `GET /ws/{course_id}` — the dashboard's live present-count feed.
//!
//! On connect the socket subscribes to the course's presence topic; every
//! `broadcast` from the pipeline forwards straight through as a text
//! frame. A client MAY send `{"type":"ping"}`, answered with
//! `{"type":"pong"}`; anything else is ignored. A liveness probe pings the
//! client every 10s and drops the connection if no pong (app-level or
//! transport-level) arrives within a 20s grace window.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use db::models::course;
use serde_json::Value;
use tokio::time::{interval, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::ServerState;

const PROBE_INTERVAL: Duration = Duration::from_secs(10);
const PROBE_GRACE: Duration = Duration::from_secs(20);

pub fn ws_routes() -> Router<ServerState> {
    Router::new().route("/{course_id}", get(ws_handler))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, course_id))
}

async fn handle_socket(mut socket: WebSocket, state: ServerState, course_id: Uuid) {
    match course::Model::get(state.db(), course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            close_unknown_course(socket, course_id).await;
            return;
        }
        Err(e) => {
            warn!(%course_id, error = %e, "course lookup failed on ws upgrade");
            close_unknown_course(socket, course_id).await;
            return;
        }
    }

    let mut updates = state.presence().subscribe(course_id).await;
    let mut probe = interval(PROBE_INTERVAL);
    probe.tick().await; // consume the immediate first tick
    let mut last_alive = Instant::now();

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Ok(msg) => {
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        last_alive = Instant::now();
                        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text) {
                            if map.get("type").and_then(Value::as_str) == Some("ping") {
                                if socket.send(Message::Text(r#"{"type":"pong"}"#.into())).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        last_alive = Instant::now();
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        last_alive = Instant::now();
                    }
                    Some(Err(e)) => {
                        debug!(%course_id, error = %e, "ws receive error");
                        break;
                    }
                }
            }
            _ = probe.tick() => {
                if last_alive.elapsed() > PROBE_GRACE {
                    debug!(%course_id, "ws liveness probe grace exceeded, closing");
                    break;
                }
                if socket.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn close_unknown_course(mut socket: WebSocket, course_id: Uuid) {
    use axum::extract::ws::CloseFrame;
    debug!(%course_id, "ws upgrade rejected: unknown course");
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: 1008,
            reason: "unknown course".into(),
        })))
        .await;
}
