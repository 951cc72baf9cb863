//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, Json, response::{Html, IntoResponse}};
use tracing::{info, instrument};

use crate::error::GameError;
use crate::games::Action;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let sessions = state.session_count().await;
  Json(HealthOut { ok: true, sessions, ai: state.openai.is_some() })
}

#[instrument(level = "info", skip(state, body), fields(mode = %body.mode, premium = body.premium))]
pub async fn http_start_game(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartGameIn>,
) -> Json<GameOut> {
  let (session_id, view) = start_game(&state, body.mode, body.premium, body.payload).await;
  Json(GameOut { session_id, view })
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_view(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<ViewOut>, GameError> {
  let view = current_view(&state, &id).await?;
  Ok(Json(ViewOut { view }))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_html(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Html<String>, GameError> {
  Ok(Html(current_html(&state, &id).await?))
}

#[instrument(level = "info", skip(state, action), fields(%id, action = action.name()))]
pub async fn http_post_action(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(action): Json<Action>,
) -> Result<Json<ActionOut>, GameError> {
  // No socket to push to; HTTP clients poll the view after the flip-back.
  let (view, event) = apply_action(&state, &id, action, None).await?;
  Ok(Json(ActionOut { view, event }))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_end_game(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<EndOut>, GameError> {
  if end_game(&state, &id).await {
    Ok(Json(EndOut { ok: true }))
  } else {
    Err(GameError::UnknownSession(id))
  }
}

#[instrument(level = "info", skip(state, body), fields(mode = %body.mode, premium = body.premium, text_len = body.text.len()))]
pub async fn http_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> Result<Json<GenerateOut>, GameError> {
  let (session_id, view, source) = generate_game(&state, body).await?;
  info!(target: "games", id = %session_id, ?source, "HTTP game generated");
  Ok(Json(GenerateOut { session_id, view, source }))
}
