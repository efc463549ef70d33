use std::net::SocketAddr;
use std::sync::Arc;

use api::routes::routes;
use api::state::ServerState;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::Router;
use engine::{CodeEngine, CodeEngineConfig};
use sea_orm::DatabaseConnection;
use util::ws::WebSocketManager;

pub const TEST_PEER: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(10, 0, 0, 5)), 54321);

/// Builds a router against a fresh in-memory database with a deterministic
/// code alphabet, so tests can assert on exact confirmation codes.
pub async fn make_test_app() -> (Router, ServerState) {
    let db: DatabaseConnection = db::test_utils::setup_test_db().await;
    make_test_app_with_db(db).await
}

pub async fn make_test_app_with_db(db: DatabaseConnection) -> (Router, ServerState) {
    let ws = WebSocketManager::new();
    let code_engine = Arc::new(CodeEngine::new(CodeEngineConfig {
        code_length: 6,
        alphabet: "A".chars().collect(),
        lifetime: chrono::Duration::seconds(300),
    }));
    let state = ServerState::new(db, ws, code_engine);
    (routes(state.clone()), state)
}

/// `ConnectInfo` is normally injected by `into_make_service_with_connect_info`
/// when serving over a real socket; `oneshot`-driven tests insert it by hand.
pub fn with_test_peer(mut req: Request<Body>) -> Request<Body> {
    req.extensions_mut().insert(ConnectInfo(TEST_PEER));
    req
}

pub fn with_peer(mut req: Request<Body>, addr: SocketAddr) -> Request<Body> {
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}
