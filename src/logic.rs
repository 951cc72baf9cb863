//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Opening games from a payload (or from a generation request)
//!   - Applying user actions and emitting answer events
//!   - Scheduling the deferred flashcard move
//!   - Rendering and closing sessions
//!   - Sweeping sessions nobody has touched for a while

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::GameMode;
use crate::error::GameError;
use crate::games::{Action, Game, GameView, Step};
use crate::openai::GenerationRequest;
use crate::protocol::{AnswerEvent, GenerateIn, PayloadSource, ServerWsMessage};
use crate::render::render_view;
use crate::seeds::demo_payload;
use crate::state::{AppState, GameSession};
use crate::util::truncate_chars;

/// Open a game from a raw payload. Malformed payloads still open; they show a data error.
#[instrument(level = "info", skip(state, payload), fields(%mode, premium))]
pub async fn start_game(state: &AppState, mode: GameMode, premium: bool, payload: serde_json::Value) -> (String, GameView) {
  let game = Game::new(mode, payload, &mut rand::thread_rng());
  let id = Uuid::new_v4().to_string();
  let items = game.len();
  if items == 0 {
    warn!(target: "games", %id, %mode, "Payload held no usable items; serving data-error view");
  }

  let session = GameSession::new(id.clone(), premium, game);
  let view = session.view();
  state.insert_session(session).await;
  info!(target: "games", %id, %mode, items, "Game session opened");
  (id, view)
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn current_view(state: &AppState, id: &str) -> Result<GameView, GameError> {
  let mut sessions = state.sessions.write().await;
  let session = sessions.get_mut(id).ok_or_else(|| GameError::UnknownSession(id.to_string()))?;
  session.touch();
  Ok(session.view())
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn current_html(state: &AppState, id: &str) -> Result<String, GameError> {
  let view = current_view(state, id).await?;
  Ok(render_view(&view, &state.config.ui)?)
}

/// Apply one action to a session.
///
/// Flashcard navigation returns right away with the card face down; the index
/// moves after the flip-back delay in a spawned task. When `notify` is given
/// (WebSocket), the settled view is pushed through it.
#[instrument(level = "info", skip_all, fields(%id, action = action.name()))]
pub async fn apply_action(
  state: &Arc<AppState>,
  id: &str,
  action: Action,
  notify: Option<UnboundedSender<ServerWsMessage>>,
) -> Result<(GameView, Option<AnswerEvent>), GameError> {
  let (view, event, deferred) = {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(id).ok_or_else(|| GameError::UnknownSession(id.to_string()))?;
    session.touch();
    let applied = session.game.apply(action)?;
    let event = applied.answer.map(|record| AnswerEvent::new(id, session.mode(), record));
    (session.view(), event, applied.deferred)
  };

  if let Some(ev) = &event {
    info!(target: "answers", session = %ev.session_id, mode = %ev.mode, item = ev.item, answer = ?ev.answer, correct = ev.correct, "Answer recorded");
  }
  if let Some(step) = deferred {
    schedule_settle(Arc::clone(state), id.to_string(), step, notify);
  }
  Ok((view, event))
}

/// Fire-and-forget: move the flashcard index once the flip-back has played.
fn schedule_settle(state: Arc<AppState>, id: String, step: Step, notify: Option<UnboundedSender<ServerWsMessage>>) {
  let delay = state.flip_back_delay();
  tokio::spawn(async move {
    tokio::time::sleep(delay).await;
    let view = {
      let mut sessions = state.sessions.write().await;
      match sessions.get_mut(&id) {
        Some(session) => {
          session.game.settle(step);
          session.view()
        }
        None => {
          debug!(target: "games", %id, "Session closed before flashcard move settled");
          return;
        }
      }
    };
    if let Some(tx) = notify {
      // The socket may be gone already; nothing to do then.
      let _ = tx.send(ServerWsMessage::View { session_id: id, view });
    }
  });
}

/// Periodically drop sessions idle for longer than `ttl`. Runs until the runtime stops.
pub fn spawn_idle_sweeper(state: Arc<AppState>, every: Duration, ttl: Duration) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      let evicted = state.evict_idle(ttl).await;
      if evicted > 0 {
        let remaining = state.session_count().await;
        info!(target: "games", evicted, remaining, "Idle sessions swept");
      }
    }
  })
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn end_game(state: &AppState, id: &str) -> bool {
  let removed = state.remove_session(id).await;
  if removed {
    info!(target: "games", %id, "Game session closed");
  }
  removed
}

/// Generate a payload from source text and open a game on it.
///
/// Without an AI client the mode's demo payload is used instead.
#[instrument(level = "info", skip(state, req), fields(mode = %req.mode, premium = req.premium, text_len = req.text.len()))]
pub async fn generate_game(state: &AppState, req: GenerateIn) -> Result<(String, GameView, PayloadSource), GameError> {
  let limits = &state.config.limits;
  if !limits.allows(req.mode, req.premium) {
    return Err(GameError::ModeLocked(req.mode));
  }
  let text = req.text.trim();
  if text.is_empty() {
    return Err(GameError::EmptySource);
  }

  let count = limits.item_count(req.premium, req.count);
  // Focus topics are a premium feature; free requests silently drop them.
  let focus = req
    .focus
    .as_deref()
    .map(str::trim)
    .filter(|f| req.premium && !f.is_empty())
    .map(|f| truncate_chars(f, limits.max_focus_chars));
  let text = truncate_chars(text, limits.max_source_chars);

  let (payload, source) = match &state.openai {
    Some(oa) => {
      let gen_req = GenerationRequest { mode: req.mode, count, focus, text };
      match oa.generate_payload(&state.config.prompts, &gen_req).await {
        Ok(v) => (v, PayloadSource::Generated),
        Err(e) => {
          error!(target: "games", mode = %req.mode, error = %e, "Generation failed");
          return Err(GameError::Generation(e));
        }
      }
    }
    None => {
      warn!(target: "games", mode = %req.mode, "No AI client configured; serving demo payload");
      (demo_payload(req.mode), PayloadSource::Demo)
    }
  };

  let (id, view) = start_game(state, req.mode, req.premium, payload).await;
  Ok((id, view, source))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use crate::games::{Mark, Submitted};
  use serde_json::json;

  fn state() -> Arc<AppState> {
    let mut config = GameConfig::default();
    config.ui.flip_back_delay_ms = 10;
    Arc::new(AppState::with_config(config, None))
  }

  #[tokio::test]
  async fn answers_emit_events_and_lock() {
    let state = state();
    let payload = json!([{ "statement": "Fire is cold.", "is_correct": false }]);
    let (id, _) = start_game(&state, GameMode::TrueFalse, false, payload).await;

    let (_, event) = apply_action(&state, &id, Action::Choose { item: 0, value: false }, None).await.unwrap();
    let event = event.expect("event");
    assert!(event.correct);
    assert_eq!(event.answer, Submitted::Bool(false));

    let (view, event) = apply_action(&state, &id, Action::Choose { item: 0, value: true }, None).await.unwrap();
    assert!(event.is_none());
    match view {
      GameView::TrueFalse { items } => assert_eq!(items[0].choices[1].mark, Mark::Correct),
      other => panic!("unexpected view {other:?}"),
    }
  }

  #[tokio::test]
  async fn flashcard_move_settles_after_delay_and_notifies() {
    let state = state();
    let payload = json!([{ "front": "a", "back": "1" }, { "front": "b", "back": "2" }]);
    let (id, _) = start_game(&state, GameMode::Flashcard, false, payload).await;

    apply_action(&state, &id, Action::Flip, None).await.unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let (view, _) = apply_action(&state, &id, Action::Prev, Some(tx)).await.unwrap();
    match view {
      GameView::Flashcard { card } => {
        assert!(!card.flipped);
        assert_eq!(card.position, 1);
      }
      other => panic!("unexpected view {other:?}"),
    }

    match rx.recv().await {
      Some(ServerWsMessage::View { session_id, view: GameView::Flashcard { card } }) => {
        assert_eq!(session_id, id);
        assert_eq!(card.position, 2);
      }
      other => panic!("unexpected push {other:?}"),
    }
  }

  #[tokio::test]
  async fn unknown_sessions_are_reported() {
    let state = state();
    let err = apply_action(&state, "missing", Action::Flip, None).await.unwrap_err();
    assert!(matches!(err, GameError::UnknownSession(_)));
    assert!(!end_game(&state, "missing").await);
  }

  #[tokio::test]
  async fn end_game_drops_the_session() {
    let state = state();
    let (id, _) = start_game(&state, GameMode::Qa, true, json!([{ "question": "?" }])).await;
    assert_eq!(state.session_count().await, 1);
    assert!(end_game(&state, &id).await);
    assert!(matches!(current_view(&state, &id).await, Err(GameError::UnknownSession(_))));
  }

  #[tokio::test]
  async fn sweeper_drops_abandoned_sessions_only() {
    let state = state();
    let (abandoned, _) = start_game(&state, GameMode::Flashcard, false, json!([{ "front": "a" }])).await;
    let (active, _) = start_game(&state, GameMode::Flashcard, false, json!([{ "front": "b" }])).await;
    let sweeper = spawn_idle_sweeper(Arc::clone(&state), Duration::from_millis(10), Duration::from_millis(80));

    for _ in 0..6 {
      tokio::time::sleep(Duration::from_millis(25)).await;
      current_view(&state, &active).await.unwrap();
    }
    sweeper.abort();

    assert!(matches!(current_view(&state, &abandoned).await, Err(GameError::UnknownSession(_))));
    assert!(current_view(&state, &active).await.is_ok());
    assert_eq!(state.session_count().await, 1);
  }

  #[tokio::test]
  async fn generation_respects_entitlement() {
    let state = state();
    let req = GenerateIn { mode: GameMode::Qa, premium: false, text: "Some text".into(), count: None, focus: None };
    assert!(matches!(generate_game(&state, req).await, Err(GameError::ModeLocked(GameMode::Qa))));

    let req = GenerateIn { mode: GameMode::Flashcard, premium: false, text: "   ".into(), count: None, focus: None };
    assert!(matches!(generate_game(&state, req).await, Err(GameError::EmptySource)));
  }

  #[tokio::test]
  async fn generation_without_ai_serves_demo() {
    let state = state();
    let req = GenerateIn {
      mode: GameMode::MultipleChoice,
      premium: false,
      text: "Planets orbit the Sun.".into(),
      count: Some(3),
      focus: Some("Mercury".into()),
    };
    let (id, view, source) = generate_game(&state, req).await.unwrap();
    assert_eq!(source, PayloadSource::Demo);
    match view {
      GameView::MultipleChoice { items } => assert_eq!(items.len(), 3),
      other => panic!("unexpected view {other:?}"),
    }
    assert!(current_html(&state, &id).await.unwrap().contains("Which planet"));
  }
}
