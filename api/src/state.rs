//! Shared application state for the attendance server.
//!
//! Combines the database connection and WebSocket manager from `util`
//! with the code-minting and presence collaborators from `engine`. Lives
//! here rather than in `util` so that `util` never depends on `engine`.

use std::sync::Arc;

use engine::{CodeEngine, PresenceBus};
use sea_orm::DatabaseConnection;
use util::ws::WebSocketManager;

#[derive(Clone)]
pub struct ServerState {
    db: DatabaseConnection,
    ws: WebSocketManager,
    code_engine: Arc<CodeEngine>,
    presence: PresenceBus,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, ws: WebSocketManager, code_engine: Arc<CodeEngine>) -> Self {
        let presence = PresenceBus::new(ws.clone());
        Self {
            db,
            ws,
            code_engine,
            presence,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    pub fn code_engine(&self) -> &CodeEngine {
        &self.code_engine
    }

    pub fn presence(&self) -> &PresenceBus {
        &self.presence
    }
}
