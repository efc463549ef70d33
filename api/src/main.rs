use std::sync::Arc;

use api::routes::routes;
use api::state::ServerState;
use engine::{CodeEngine, CodeEngineConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use util::ws::WebSocketManager;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let file_appender = tracing_appender::rolling::daily("logs", "attendance-server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::new(util::config::log_filter()))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let database_url = util::config::database_url();
    let db = db::connect(&database_url)
        .await
        .expect("failed to connect to database");

    let code_engine = Arc::new(CodeEngine::new(CodeEngineConfig::new(
        util::config::confirmation_code_length(),
        util::config::confirmation_code_duration_seconds(),
    )));
    let ws = WebSocketManager::new();
    let state = ServerState::new(db, ws, code_engine);

    let app = routes(state).into_make_service_with_connect_info::<std::net::SocketAddr>();

    let host = util::config::server_host();
    let port = util::config::server_port();
    let addr: std::net::SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("invalid SERVER_HOST/SERVER_PORT");

    tracing::info!(%addr, "attendance server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("server error");
}
