//! Lingua Admin · Back-office for the language-learning platform
//!
//! - Axum HTTP API for the admin analytics dashboard and the module editor
//! - Talks to the platform REST API (modules, students, analytics)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   PLATFORM_API_URL   : platform base URL, default "http://localhost:4000"
//!   PLATFORM_API_TOKEN : bearer token forwarded to the platform, if set
//!   ADMIN_CONFIG_PATH  : path to TOML config (upstream, editor, analytics, chrome)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod config;
mod error;
mod domain;
mod draft;
mod record;
mod payload;
mod editor;
mod analytics;
mod protocol;
mod upstream;
mod state;
mod logic;
mod routes;
#[cfg(test)]
mod fixtures;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared state: config, platform client, editor sessions.
  let state = Arc::new(AppState::from_env()?);

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "lingua_admin", %addr, platform = %state.upstream.base_url, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
