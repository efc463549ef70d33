//! App config: on-demand env getters + a full snapshot.
//!
//! Unlike this codebase's other services, every variable here has a
//! documented default, so the server boots without an `.env` file at all.
//! No global singleton; each call reads the current process env (a cached
//! snapshot is available via [`AppConfig::from_env`] for call sites that
//! want a bunch of fields at once).

use std::str::FromStr;
use std::sync::Once;

#[inline]
fn ensure_dotenv() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        if !cfg!(test) {
            let _ = dotenvy::dotenv();
        }
    });
}

#[inline]
fn get_or(key: &'static str, default: &str) -> String {
    ensure_dotenv();
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

#[inline]
fn get_opt(key: &'static str) -> Option<String> {
    ensure_dotenv();
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}

#[inline]
fn parse_or<T: FromStr>(key: &'static str, default: T) -> T
where
    <T as FromStr>::Err: std::fmt::Display,
{
    ensure_dotenv();
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .parse()
            .unwrap_or_else(|e| panic!("invalid {key}: {e}")),
        _ => default,
    }
}

/// Full snapshot, for call sites that want several fields at once.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub frontend_build_path: Option<String>,
    pub confirmation_code_duration_seconds: u64,
    pub confirmation_code_length: usize,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: database_url(),
            server_host: server_host(),
            server_port: server_port(),
            frontend_build_path: frontend_build_path(),
            confirmation_code_duration_seconds: confirmation_code_duration_seconds(),
            confirmation_code_length: confirmation_code_length(),
            log_filter: log_filter(),
        }
    }
}

// ----- Top-level getters under `config::` -----

pub fn database_url() -> String {
    get_or("DATABASE_URL", "sqlite://attendance.db?mode=rwc")
}

pub fn server_host() -> String {
    get_or("SERVER_HOST", "0.0.0.0")
}

pub fn server_port() -> u16 {
    parse_or("SERVER_PORT", 8080)
}

/// Absent means no static asset serving, consistent with the spec's
/// Non-goal on the dashboard UI's own asset server.
pub fn frontend_build_path() -> Option<String> {
    get_opt("FRONTEND_BUILD_PATH")
}

pub fn confirmation_code_duration_seconds() -> u64 {
    parse_or("CONFIRMATION_CODE_DURATION_SECONDS", 300)
}

pub fn confirmation_code_length() -> usize {
    parse_or("CONFIRMATION_CODE_LENGTH", 6)
}

/// `tracing_subscriber::EnvFilter` directive string. `RUST_LOG` is the
/// conventional variable name for this; we honor it directly rather than
/// inventing a project-prefixed one.
pub fn log_filter() -> String {
    get_or("RUST_LOG", "info")
}
