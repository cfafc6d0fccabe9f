//! Hafizh · Quran memorization quiz backend
//!
//! - Axum HTTP + WebSocket API
//! - Word-by-word and next-ayah quizzes with oracle-generated distractors
//! - Challenge/question authoring with invariant validation
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   APP_CONFIG_PATH  : path to TOML config (data files + quiz tuning)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod error;
mod config;
mod corpus;
mod oracle;
mod distractor;
mod sequencer;
mod validation;
mod store;
mod state;
mod protocol;
mod logic;
mod routes;
#[cfg(test)]
mod testutil;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::load_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_config_from_env().unwrap_or_default();

  // Corpus and models are required; refuse to serve without them.
  let state = match AppState::load(&cfg) {
    Ok(s) => Arc::new(s),
    Err(e) => {
      error!(target: "hafizh_backend", error = %e, "Startup failed");
      return Err(e.into());
    }
  };

  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "hafizh_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
