pub mod app;
pub mod ws;

pub use app::{TEST_PEER, make_test_app, make_test_app_with_db, with_peer, with_test_peer};
pub use ws::{connect_ws, spawn_server};
