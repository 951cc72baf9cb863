//! Loading game configuration (prompts, generation limits, UI settings) from TOML.
//!
//! Every section is optional; missing keys fall back to `Default`.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::GameMode;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub limits: GenerationLimits,
  #[serde(default)]
  pub ui: UiConfig,
  #[serde(default)]
  pub sessions: SessionConfig,
}

/// Prompts used by the generation client.
/// `{mode}`, `{count}`, `{focus}`, `{format}` and `{text}` are filled per request.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub generate_system: String,
  pub generate_user_template: String,
  pub focus_default: String,
  pub focus_template: String,
  pub formats: ModeFormats,
}

/// Per-mode output format instructions appended to the generation prompt.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ModeFormats {
  pub multiple_choice: String,
  pub true_false: String,
  pub flashcard: String,
  pub fill_blank: String,
  pub qa: String,
}

impl ModeFormats {
  pub fn for_mode(&self, mode: GameMode) -> &str {
    match mode {
      GameMode::MultipleChoice => &self.multiple_choice,
      GameMode::TrueFalse => &self.true_false,
      GameMode::Flashcard => &self.flashcard,
      GameMode::FillBlank => &self.fill_blank,
      GameMode::Qa => &self.qa,
    }
  }
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generate_system: "You write study games from source documents. Respond ONLY with strict JSON, no markdown.".into(),
      generate_user_template: "Build a {mode} game with {count} items.\nFocus: {focus}\nReturn a JSON object with an \"items\" array.\n\nFormat:\n{format}\n\nSource text:\n{text}".into(),
      focus_default: "Cover the whole text evenly.".into(),
      focus_template: "Concentrate on the topic: \"{focus}\".".into(),
      formats: ModeFormats::default(),
    }
  }
}

impl Default for ModeFormats {
  fn default() -> Self {
    Self {
      multiple_choice: "Spread correct answers randomly over A-D; distractors must be plausible.\n[{\"question\": \"...\", \"options\": {\"A\": \"...\", \"B\": \"...\", \"C\": \"...\", \"D\": \"...\"}, \"answer\": \"A\", \"explanation\": \"...\"}]".into(),
      true_false: "Half the statements true, half false; false ones change a small detail.\n[{\"statement\": \"...\", \"is_correct\": true, \"explanation\": \"...\"}]".into(),
      flashcard: "Front holds a term or concept, back its definition.\n[{\"front\": \"...\", \"back\": \"...\"}]".into(),
      fill_blank: "Hide a key noun, verb or term (never a function word) behind [BLANK].\n[{\"sentence_with_blank\": \"... [BLANK] ...\", \"hidden_word\": \"...\", \"explanation\": \"...\"}]".into(),
      qa: "Open questions that need reasoning, with a model answer and key points.\n[{\"question\": \"...\", \"suggested_answer\": \"...\", \"key_points\": [\"...\"], \"explanation\": \"...\"}]".into(),
    }
  }
}

/// Entitlement-dependent limits for generated games.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationLimits {
  /// Modes a non-premium session may generate.
  pub free_modes: Vec<GameMode>,
  pub free_items: usize,
  pub premium_default_items: usize,
  pub premium_max_items: usize,
  pub max_source_chars: usize,
  pub max_focus_chars: usize,
}

impl Default for GenerationLimits {
  fn default() -> Self {
    Self {
      free_modes: vec![GameMode::MultipleChoice, GameMode::Flashcard],
      free_items: 5,
      premium_default_items: 10,
      premium_max_items: 20,
      max_source_chars: 40_000,
      max_focus_chars: 200,
    }
  }
}

impl GenerationLimits {
  pub fn allows(&self, mode: GameMode, premium: bool) -> bool {
    premium || self.free_modes.contains(&mode)
  }

  /// Item count for a request. Free sessions always get `free_items`.
  pub fn item_count(&self, premium: bool, requested: Option<usize>) -> usize {
    if !premium {
      return self.free_items;
    }
    requested
      .filter(|n| *n > 0)
      .unwrap_or(self.premium_default_items)
      .min(self.premium_max_items)
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
  /// Delay between facing a flashcard down and moving to the next one.
  pub flip_back_delay_ms: u64,
  /// Shown instead of an explanation for non-premium sessions.
  pub upgrade_text: String,
}

impl Default for UiConfig {
  fn default() -> Self {
    Self { flip_back_delay_ms: 300, upgrade_text: "(Upgrade to Pro to view)".into() }
  }
}

/// Sessions untouched for `idle_ttl_secs` are dropped by a sweep every `sweep_interval_secs`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
  pub idle_ttl_secs: u64,
  pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self { idle_ttl_secs: 30 * 60, sweep_interval_secs: 60 }
  }
}

impl SessionConfig {
  pub fn idle_ttl(&self) -> Duration {
    Duration::from_secs(self.idle_ttl_secs)
  }

  /// Never zero; `tokio::time::interval` panics on a zero period.
  pub fn sweep_interval(&self) -> Duration {
    Duration::from_secs(self.sweep_interval_secs.max(1))
  }
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameConfig>(&s) {
      Ok(cfg) => {
        info!(target: "studygame", %path, "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "studygame", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "studygame", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
