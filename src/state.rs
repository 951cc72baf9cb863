//! Application state: the in-memory game session store, config and the optional AI client.
//!
//! Sessions live only in memory. They are dropped explicitly (DELETE /
//! `end_game`), when the WebSocket that opened them disconnects, or by the
//! idle sweep once nobody has touched them for the configured TTL.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::{load_game_config_from_env, GameConfig};
use crate::domain::GameMode;
use crate::games::{Game, GameView};
use crate::openai::OpenAI;

/// One game being played, with the entitlement it was opened with.
pub struct GameSession {
    pub id: String,
    pub premium: bool,
    pub game: Game,
    /// Last time a client read or changed this session.
    pub last_seen: Instant,
}

impl GameSession {
    pub fn new(id: String, premium: bool, game: Game) -> Self {
        Self { id, premium, game, last_seen: Instant::now() }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn mode(&self) -> GameMode {
        self.game.mode()
    }

    pub fn view(&self) -> GameView {
        self.game.view(self.premium)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, GameSession>>>,
    pub openai: Option<OpenAI>,
    pub config: GameConfig,
}

impl AppState {
    /// Build state from env: load config, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_game_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "studygame", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "studygame", "OpenAI disabled (no OPENAI_API_KEY). Generation serves demo payloads.");
        }

        Self::with_config(config, openai)
    }

    pub fn with_config(config: GameConfig, openai: Option<OpenAI>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            openai,
            config,
        }
    }

    pub fn flip_back_delay(&self) -> Duration {
        Duration::from_millis(self.config.ui.flip_back_delay_ms)
    }

    #[instrument(level = "debug", skip(self, session), fields(id = %session.id))]
    pub async fn insert_session(&self, session: GameSession) {
        self.sessions.write().await.insert(session.id.clone(), session);
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn remove_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session idle for longer than `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, s| {
            let keep = s.last_seen.elapsed() <= ttl;
            if !keep {
                debug!(target: "games", %id, mode = %s.mode(), "Evicting idle session");
            }
            keep
        });
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn session(id: &str) -> GameSession {
        let game = Game::new(GameMode::Flashcard, json!([{ "front": "a", "back": "b" }]), &mut StdRng::seed_from_u64(1));
        GameSession::new(id.to_string(), false, game)
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_and_touched_ones_kept() {
        let state = AppState::with_config(GameConfig::default(), None);
        state.insert_session(session("old")).await;
        state.insert_session(session("fresh")).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        if let Some(s) = state.sessions.write().await.get_mut("fresh") {
            s.touch();
        }

        assert_eq!(state.evict_idle(Duration::from_millis(20)).await, 1);
        let sessions = state.sessions.read().await;
        assert!(sessions.contains_key("fresh"));
        assert!(!sessions.contains_key("old"));
    }
}
