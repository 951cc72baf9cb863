//! Study Game Engine · Backend
//!
//! - Interactive study games (multiple choice, true/false, flashcards,
//!   fill-in-the-blank, Q&A) over an Axum HTTP + WebSocket API
//! - Lenient decoding of AI-generated payloads
//! - Optional OpenAI generation (via environment variables)
//! - Static frontend fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 5000)
//!   OPENAI_API_KEY   : enables generation if present (demo payloads otherwise)
//!   OPENAI_BASE_URL  : default "https://api.openai.com/v1"
//!   OPENAI_MODEL     : default "gpt-4o-mini"
//!   GAME_CONFIG_PATH : path to TOML config (prompts, limits, ui, sessions)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod sanitize;
mod answer;
mod shuffle;
mod games;
mod error;
mod config;
mod seeds;
mod state;
mod protocol;
mod logic;
mod openai;
mod render;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared state: session store, config, optional OpenAI client.
  let state = Arc::new(AppState::new());

  let sessions = &state.config.sessions;
  logic::spawn_idle_sweeper(state.clone(), sessions.sweep_interval(), sessions.idle_ttl());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "studygame", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "studygame", sessions = state.session_count().await, "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "studygame", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "studygame", "Shutdown signal received");
}
