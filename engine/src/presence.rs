//! The presence bus (C5): fans today's present-count out to every live
//! WebSocket subscriber of a course, built directly on this codebase's
//! topic-based broadcast manager. A course's topic is simply its
//! `course_id`; the manager's existing per-user presence refcounting is
//! unused here since bus subscribers are anonymous connections — "is
//! anyone subscribed" is exactly what the broadcast channel's subscriber
//! count already answers.

use db::store;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;
use util::ws::WebSocketManager;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct AttendanceUpdate {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "presentCount")]
    present_count: u64,
}

#[derive(Clone)]
pub struct PresenceBus {
    ws: WebSocketManager,
}

impl PresenceBus {
    pub fn new(ws: WebSocketManager) -> Self {
        Self { ws }
    }

    pub fn topic(course_id: Uuid) -> String {
        format!("course:{course_id}")
    }

    /// Subscribes to `course_id`'s topic; the returned receiver is the
    /// subscriber handle. Dropping it is the idempotent unsubscribe.
    pub async fn subscribe(&self, course_id: Uuid) -> broadcast::Receiver<String> {
        self.ws.subscribe(&Self::topic(course_id)).await
    }

    /// Reads today's present-count once and pushes it to every current
    /// subscriber of `course_id`. Never fails the caller: storage errors
    /// and a missing course are logged and swallowed, matching the
    /// pipeline's "broadcast failures never change the reply" contract.
    pub async fn broadcast(&self, db: &DatabaseConnection, course_id: Uuid) {
        let today = util::clock::today(util::clock::now())
            .format("%Y-%m-%d")
            .to_string();

        match store::present_count(db, course_id, &today).await {
            Ok(Some(count)) => {
                let update = AttendanceUpdate {
                    kind: "attendance_update",
                    present_count: count,
                };
                match serde_json::to_string(&update) {
                    Ok(json) => self.ws.broadcast(&Self::topic(course_id), json).await,
                    Err(e) => warn!(%course_id, error = %e, "failed to serialize attendance_update"),
                }
            }
            Ok(None) => {
                warn!(%course_id, "presence broadcast skipped: course missing");
            }
            Err(e) => {
                warn!(%course_id, error = %e, "presence broadcast failed to read present_count");
            }
        }
    }
}
