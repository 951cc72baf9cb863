//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::GameMode;
use crate::games::{Action, AnswerRecord, GameView, Submitted};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    StartGame {
        mode: GameMode,
        #[serde(default)]
        premium: bool,
        #[serde(default)]
        payload: Value,
    },
    Generate(GenerateIn),
    Action {
        #[serde(rename = "sessionId")]
        session_id: String,
        action: Action,
    },
    View {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    EndGame {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Game {
        #[serde(rename = "sessionId")]
        session_id: String,
        view: GameView,
    },
    /// Current view; also pushed unprompted after a deferred flashcard move.
    View {
        #[serde(rename = "sessionId")]
        session_id: String,
        view: GameView,
    },
    ActionResult {
        #[serde(rename = "sessionId")]
        session_id: String,
        view: GameView,
        #[serde(skip_serializing_if = "Option::is_none")]
        event: Option<AnswerEvent>,
    },
    Ended {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Error {
        message: String,
    },
}

/// A user answer, handed back to the caller for optional logging.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AnswerEvent {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub mode: GameMode,
    pub item: usize,
    pub answer: Submitted,
    pub correct: bool,
}

impl AnswerEvent {
    pub fn new(session_id: &str, mode: GameMode, record: AnswerRecord) -> Self {
        Self {
            session_id: session_id.to_string(),
            mode,
            item: record.item,
            answer: record.answer,
            correct: record.correct,
        }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartGameIn {
    pub mode: GameMode,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Serialize)]
pub struct GameOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub view: GameView,
}

#[derive(Debug, Serialize)]
pub struct ViewOut {
    pub view: GameView,
}

#[derive(Debug, Serialize)]
pub struct ActionOut {
    pub view: GameView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<AnswerEvent>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    pub mode: GameMode,
    #[serde(default)]
    pub premium: bool,
    /// Plain text already extracted from the uploaded document.
    pub text: String,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub focus: Option<String>,
}

/// Where a generated payload came from.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    Generated,
    Demo,
}

#[derive(Debug, Serialize)]
pub struct GenerateOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub view: GameView,
    pub source: PayloadSource,
}

#[derive(Serialize)]
pub struct EndOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub sessions: usize,
    pub ai: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_parse() {
        let m: ClientWsMessage = serde_json::from_value(json!({
            "type": "action",
            "sessionId": "s1",
            "action": { "type": "choose", "item": 0, "value": true }
        }))
        .unwrap();
        assert!(matches!(
            m,
            ClientWsMessage::Action { ref session_id, action: Action::Choose { item: 0, value: true } } if session_id == "s1"
        ));

        let m: ClientWsMessage =
            serde_json::from_value(json!({ "type": "start_game", "mode": "qa" })).unwrap();
        assert!(matches!(m, ClientWsMessage::StartGame { mode: GameMode::Qa, premium: false, payload: Value::Null }));

        let m: ClientWsMessage = serde_json::from_value(json!({
            "type": "generate", "mode": "flashcard", "text": "Cells are small."
        }))
        .unwrap();
        assert!(matches!(m, ClientWsMessage::Generate(GenerateIn { mode: GameMode::Flashcard, .. })));
    }

    #[test]
    fn answer_events_serialize_flat() {
        let record = AnswerRecord { item: 2, answer: Submitted::Bool(false), correct: true };
        let event = AnswerEvent::new("abc", GameMode::TrueFalse, record);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "sessionId": "abc", "mode": "true_false", "item": 2, "answer": false, "correct": true })
        );
    }
}
