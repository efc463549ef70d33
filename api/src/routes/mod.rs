//! Top-level routing configuration for the attendance server.
//!
//! Each submodule owns one route group; `routes()` nests them all under
//! the state shared by the whole server.

pub mod attendance;
pub mod confirmation_code;
pub mod courses;
pub mod health;
pub mod preferences;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::ServerState;
use crate::ws::ws_routes;

/// The dashboard and student-facing form are served by a separate asset
/// collaborator (out of the core's scope, §1), possibly on a different
/// origin than this API — so every response carries a permissive CORS
/// header. There are no cookies or credentials in play (no auth, per the
/// spec's Non-goals), so a wildcard origin carries no session-hijacking
/// risk here.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn routes(state: ServerState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/courses", courses::courses_routes())
        .nest("/confirmation-code", confirmation_code::confirmation_code_routes())
        .nest("/attendance", attendance::attendance_routes())
        .nest("/preferences", preferences::preferences_routes())
        .nest("/ws", ws_routes())
        .layer(cors_layer())
        .with_state(state)
}
