//! Error type for game sessions and the HTTP surface.
//!
//! Malformed payloads never end up here: they degrade into a data-error view.
//! These errors cover requests that cannot be applied at all.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::GameMode;

#[derive(Debug, Error)]
pub enum GameError {
  #[error("unknown session: {0}")]
  UnknownSession(String),

  #[error("item {index} out of range ({len} items)")]
  ItemOutOfRange { index: usize, len: usize },

  #[error("option {option} out of range for item {item} ({len} options)")]
  OptionOutOfRange { item: usize, option: usize, len: usize },

  #[error("action '{action}' does not apply to {mode} games")]
  UnsupportedAction { mode: GameMode, action: &'static str },

  #[error("{0} games require a premium session")]
  ModeLocked(GameMode),

  #[error("source text is empty")]
  EmptySource,

  #[error("generation failed: {0}")]
  Generation(String),

  #[error("rendering failed: {0}")]
  Render(#[from] askama::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
  error: &'static str,
  message: String,
}

impl GameError {
  fn status(&self) -> (StatusCode, &'static str) {
    match self {
      GameError::UnknownSession(_) => (StatusCode::NOT_FOUND, "not_found"),
      GameError::ItemOutOfRange { .. }
      | GameError::OptionOutOfRange { .. }
      | GameError::UnsupportedAction { .. }
      | GameError::EmptySource => (StatusCode::BAD_REQUEST, "bad_request"),
      GameError::ModeLocked(_) => (StatusCode::FORBIDDEN, "premium_required"),
      GameError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
      GameError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_failed"),
    }
  }
}

impl IntoResponse for GameError {
  fn into_response(self) -> Response {
    let (status, error) = self.status();
    let body = Json(ErrorResponse { error, message: self.to_string() });
    (status, body).into_response()
  }
}
