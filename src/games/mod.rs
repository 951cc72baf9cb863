//! The five games and what they share.
//!
//! A game owns its normalized items plus the per-item interaction state. It
//! changes only through [`Game::apply`] (and [`Game::settle`] for the deferred
//! flashcard move) and describes itself through [`Game::view`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::GameMode;
use crate::error::GameError;
use crate::sanitize::sanitize_payload;

pub mod fill_blank;
pub mod flashcard;
pub mod mcq;
pub mod qa;
pub mod sheet;
pub mod true_false;

pub use fill_blank::{BlankItemView, BlankStatus, FillBlankGame};
pub use flashcard::{CardView, FlashcardGame, Step};
pub use mcq::{McqGame, McqItemView};
pub use qa::{QaGame, QaItemView};
pub use true_false::{TfItemView, TrueFalseGame};

/// User input, one variant per interaction any game understands.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
  /// Multiple-choice: pick option `option` (display order) for `item`.
  Select { item: usize, option: usize },
  /// True/false: answer `value`.
  Choose { item: usize, value: bool },
  Flip,
  Next,
  Prev,
  /// Fill-blank: replace the draft.
  Input { item: usize, text: String },
  /// Fill-blank: check the draft, optionally replacing it first (Enter key).
  Check {
    item: usize,
    #[serde(default)]
    text: Option<String>,
  },
  Reveal { item: usize },
  Hide { item: usize },
}

impl Action {
  pub fn name(&self) -> &'static str {
    match self {
      Action::Select { .. } => "select",
      Action::Choose { .. } => "choose",
      Action::Flip => "flip",
      Action::Next => "next",
      Action::Prev => "prev",
      Action::Input { .. } => "input",
      Action::Check { .. } => "check",
      Action::Reveal { .. } => "reveal",
      Action::Hide { .. } => "hide",
    }
  }
}

/// What the user submitted for an item.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Submitted {
  Option(usize),
  Bool(bool),
  Text(String),
}

/// A recorded answer, emitted once per accepted submission.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AnswerRecord {
  pub item: usize,
  pub answer: Submitted,
  pub correct: bool,
}

/// Result of applying one action.
#[derive(Debug, Default, PartialEq)]
pub struct Applied {
  pub answer: Option<AnswerRecord>,
  /// A move to perform later through [`Game::settle`].
  pub deferred: Option<Step>,
}

impl Applied {
  pub fn nothing() -> Self {
    Self::default()
  }

  pub fn answered(record: AnswerRecord) -> Self {
    Self { answer: Some(record), deferred: None }
  }

  pub fn later(step: Step) -> Self {
    Self { answer: None, deferred: Some(step) }
  }
}

/// Explanation visibility, decided by the entitlement flag.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Explanation {
  Shown { text: String },
  /// Present, but the session is not entitled to see it.
  Locked,
  Missing,
}

impl Explanation {
  pub fn gate(text: Option<&str>, premium: bool) -> Self {
    match (premium, text) {
      (false, _) => Explanation::Locked,
      (true, Some(t)) => Explanation::Shown { text: t.to_string() },
      (true, None) => Explanation::Missing,
    }
  }
}

/// How a choice is drawn once its item is answered.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
  /// Unanswered item: selectable.
  Open,
  Correct,
  /// The user's choice, and it was wrong.
  Wrong,
  Dimmed,
}

/// Verdict shown under an answered item.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Feedback {
  pub correct: bool,
  pub explanation: Explanation,
}

/// Everything a UI needs to draw the current state of a game.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameView {
  /// The payload held no usable items.
  DataError { mode: GameMode, message: String },
  MultipleChoice { items: Vec<McqItemView> },
  TrueFalse { items: Vec<TfItemView> },
  Flashcard { card: CardView },
  FillBlank { items: Vec<BlankItemView> },
  Qa { items: Vec<QaItemView> },
}

impl GameView {
  pub fn data_error(mode: GameMode) -> Self {
    let message = match mode {
      GameMode::Flashcard => "Card data error.",
      _ => "Data error.",
    };
    GameView::DataError { mode, message: message.to_string() }
  }
}

pub enum Game {
  Mcq(McqGame),
  TrueFalse(TrueFalseGame),
  Flashcard(FlashcardGame),
  FillBlank(FillBlankGame),
  Qa(QaGame),
}

impl Game {
  /// Sanitize `payload` and build the game for `mode`.
  pub fn new<R: Rng + ?Sized>(mode: GameMode, payload: Value, rng: &mut R) -> Self {
    let records = sanitize_payload(payload);
    debug!(target: "games", %mode, items = records.len(), "Building game from payload");
    match mode {
      GameMode::MultipleChoice => Game::Mcq(McqGame::new(&records, rng)),
      GameMode::TrueFalse => Game::TrueFalse(TrueFalseGame::new(&records)),
      GameMode::Flashcard => Game::Flashcard(FlashcardGame::new(&records)),
      GameMode::FillBlank => Game::FillBlank(FillBlankGame::new(&records)),
      GameMode::Qa => Game::Qa(QaGame::new(&records)),
    }
  }

  pub fn mode(&self) -> GameMode {
    match self {
      Game::Mcq(_) => GameMode::MultipleChoice,
      Game::TrueFalse(_) => GameMode::TrueFalse,
      Game::Flashcard(_) => GameMode::Flashcard,
      Game::FillBlank(_) => GameMode::FillBlank,
      Game::Qa(_) => GameMode::Qa,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Game::Mcq(g) => g.len(),
      Game::TrueFalse(g) => g.len(),
      Game::Flashcard(g) => g.len(),
      Game::FillBlank(g) => g.len(),
      Game::Qa(g) => g.len(),
    }
  }

  pub fn apply(&mut self, action: Action) -> Result<Applied, GameError> {
    let mode = self.mode();
    let unsupported = |a: &Action| GameError::UnsupportedAction { mode, action: a.name() };

    match (self, action) {
      (Game::Mcq(g), Action::Select { item, option }) => g.select(item, option),
      (Game::TrueFalse(g), Action::Choose { item, value }) => g.choose(item, value),
      (Game::Flashcard(g), Action::Flip) => Ok(g.flip()),
      (Game::Flashcard(g), Action::Next) => Ok(g.begin(Step::Forward)),
      (Game::Flashcard(g), Action::Prev) => Ok(g.begin(Step::Backward)),
      (Game::FillBlank(g), Action::Input { item, text }) => g.input(item, text),
      (Game::FillBlank(g), Action::Check { item, text }) => g.check(item, text),
      (Game::Qa(g), Action::Reveal { item }) => g.set_revealed(item, true),
      (Game::Qa(g), Action::Hide { item }) => g.set_revealed(item, false),
      (_, other) => Err(unsupported(&other)),
    }
  }

  /// Complete a deferred move returned in [`Applied::deferred`].
  pub fn settle(&mut self, step: Step) {
    if let Game::Flashcard(g) = self {
      g.settle(step);
    }
  }

  pub fn view(&self, premium: bool) -> GameView {
    if self.len() == 0 {
      return GameView::data_error(self.mode());
    }
    match self {
      Game::Mcq(g) => GameView::MultipleChoice { items: g.view(premium) },
      Game::TrueFalse(g) => GameView::TrueFalse { items: g.view(premium) },
      Game::Flashcard(g) => match g.view() {
        Some(card) => GameView::Flashcard { card },
        None => GameView::data_error(GameMode::Flashcard),
      },
      Game::FillBlank(g) => GameView::FillBlank { items: g.view(premium) },
      Game::Qa(g) => GameView::Qa { items: g.view(premium) },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use serde_json::json;

  fn rng() -> StdRng {
    StdRng::seed_from_u64(11)
  }

  #[test]
  fn malformed_payloads_render_a_data_error() {
    for mode in [
      GameMode::MultipleChoice,
      GameMode::TrueFalse,
      GameMode::Flashcard,
      GameMode::FillBlank,
      GameMode::Qa,
    ] {
      for payload in [json!(null), json!("oops"), json!({ "title": "x" }), json!([])] {
        let game = Game::new(mode, payload, &mut rng());
        assert!(matches!(game.view(true), GameView::DataError { .. }), "{mode} should show data error");
      }
    }
  }

  #[test]
  fn wrapped_payload_is_unwrapped() {
    let payload = json!({ "cards": [{ "front": "A", "back": "B" }] });
    let game = Game::new(GameMode::Flashcard, payload, &mut rng());
    assert_eq!(game.len(), 1);
  }

  #[test]
  fn actions_for_other_modes_are_rejected() {
    let mut game = Game::new(GameMode::Flashcard, json!([{ "front": "A", "back": "B" }]), &mut rng());
    let err = game.apply(Action::Select { item: 0, option: 0 }).unwrap_err();
    assert!(matches!(err, GameError::UnsupportedAction { action: "select", .. }));
  }

  #[test]
  fn actions_deserialize_from_tagged_json() {
    let a: Action = serde_json::from_value(json!({ "type": "select", "item": 1, "option": 2 })).unwrap();
    assert_eq!(a, Action::Select { item: 1, option: 2 });
    let a: Action = serde_json::from_value(json!({ "type": "check", "item": 0 })).unwrap();
    assert_eq!(a, Action::Check { item: 0, text: None });
    let a: Action = serde_json::from_value(json!({ "type": "next" })).unwrap();
    assert_eq!(a, Action::Next);
  }

  #[test]
  fn explanation_gate() {
    assert_eq!(Explanation::gate(Some("why"), false), Explanation::Locked);
    assert_eq!(Explanation::gate(None, false), Explanation::Locked);
    assert_eq!(Explanation::gate(Some("why"), true), Explanation::Shown { text: "why".into() });
    assert_eq!(Explanation::gate(None, true), Explanation::Missing);
  }

  #[test]
  fn data_error_serializes_with_kind_tag() {
    let v = serde_json::to_value(GameView::data_error(GameMode::Qa)).unwrap();
    assert_eq!(v, json!({ "kind": "data_error", "mode": "qa", "message": "Data error." }));
  }
}
