//! Process-wide tracing subscriber for the admin service.
//!
//! `LOG_LEVEL` takes ordinary EnvFilter directives; when it is unset or does
//! not parse, `DEFAULT_FILTER` applies. `LOG_FORMAT=json` emits one JSON
//! object per event, anything else prints readable lines. File, line and
//! target are always included.
//!
//! Targets emitted by this crate:
//! - `lingua_admin`: startup and config
//! - `analytics`: dashboard loads
//! - `editor`: sessions, edit batches, saves
//! - `upstream`: platform calls (method, path, status, latency; never bodies)

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str =
    "info,lingua_admin=debug,analytics=info,editor=info,upstream=info,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Filter from `LOG_LEVEL` directives, or the default when they are blank
/// or invalid.
fn build_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(std::env::var("LOG_LEVEL").ok()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref()) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
