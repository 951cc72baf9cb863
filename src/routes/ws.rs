//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request;
//! deferred flashcard moves push an extra `view` message when they settle.
//!
//! Sessions opened on a socket belong to it and are closed when it disconnects.

use std::collections::HashSet;
use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, error, instrument, debug};

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "studygame", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "studygame", "WebSocket connected");
  let (tx, mut rx) = mpsc::unbounded_channel::<ServerWsMessage>();
  let mut owned: HashSet<String> = HashSet::new();

  loop {
    let reply_msg = tokio::select! {
      incoming = socket.recv() => match incoming {
        Some(Ok(Message::Text(txt))) => match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "studygame", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &tx, &mut owned).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        },
        Some(Ok(Message::Ping(payload))) => {
          let _ = socket.send(Message::Pong(payload)).await;
          continue;
        }
        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
        Some(Ok(_)) => continue,
      },
      Some(pushed) = rx.recv() => pushed,
    };

    let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });

    if let Err(e) = socket.send(Message::Text(out)).await {
      error!(target: "studygame", error = %e, "WS send error");
      break;
    }
  }

  for id in owned {
    end_game(&state, &id).await;
  }
  info!(target: "studygame", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, tx, owned))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &Arc<AppState>,
  tx: &UnboundedSender<ServerWsMessage>,
  owned: &mut HashSet<String>,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::StartGame { mode, premium, payload } => {
      let (session_id, view) = start_game(state, mode, premium, payload).await;
      owned.insert(session_id.clone());
      ServerWsMessage::Game { session_id, view }
    }

    ClientWsMessage::Generate(req) => match generate_game(state, req).await {
      Ok((session_id, view, source)) => {
        info!(target: "games", id = %session_id, ?source, "WS game generated");
        owned.insert(session_id.clone());
        ServerWsMessage::Game { session_id, view }
      }
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::Action { session_id, action } => {
      match apply_action(state, &session_id, action, Some(tx.clone())).await {
        Ok((view, event)) => ServerWsMessage::ActionResult { session_id, view, event },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }

    ClientWsMessage::View { session_id } => match current_view(state, &session_id).await {
      Ok(view) => ServerWsMessage::View { session_id, view },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::EndGame { session_id } => {
      owned.remove(&session_id);
      if end_game(state, &session_id).await {
        ServerWsMessage::Ended { session_id }
      } else {
        ServerWsMessage::Error { message: format!("unknown session: {}", session_id) }
      }
    }
  }
}
