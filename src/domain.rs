//! Domain models: game modes and the per-mode item records decoded from loose JSON.
//!
//! Decoding never fails. A record missing a field simply yields an empty or
//! absent value, and the game renders that sub-part as nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answer::true_false_correct;

/// Placeholder token inside `sentence_with_blank`.
pub const BLANK_TOKEN: &str = "[BLANK]";

/// Which game is played from a payload.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
  MultipleChoice,
  TrueFalse,
  Flashcard,
  FillBlank,
  Qa,
}

impl GameMode {
  pub fn as_str(self) -> &'static str {
    match self {
      GameMode::MultipleChoice => "multiple_choice",
      GameMode::TrueFalse => "true_false",
      GameMode::Flashcard => "flashcard",
      GameMode::FillBlank => "fill_blank",
      GameMode::Qa => "qa",
    }
  }
}

impl fmt::Display for GameMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Strings pass through; numbers and booleans are stringified; the rest is absent.
fn text_of(v: &Value) -> Option<String> {
  match v {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
  record.get(key).and_then(text_of)
}

/// Like `text_field`, but an empty string counts as absent.
fn non_empty_field(record: &Value, key: &str) -> Option<String> {
  text_field(record, key).filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq)]
pub struct McqItem {
  pub question: String,
  pub options: Vec<String>,
  /// Raw correctness field; resolved later by `answer::resolve_correct_content`.
  pub correct_answer: Option<Value>,
  pub explanation: Option<String>,
}

impl McqItem {
  pub fn from_value(record: &Value) -> Self {
    // Options come either as an array or as {"A": "...", "B": "..."}.
    // Non-text entries keep their slot so numeric answers still line up.
    let options = match record.get("options") {
      Some(Value::Array(items)) => items.iter().map(|o| text_of(o).unwrap_or_default()).collect(),
      Some(Value::Object(map)) => map.values().map(|o| text_of(o).unwrap_or_default()).collect(),
      _ => Vec::new(),
    };
    let correct_answer = ["correct_answer", "answer"]
      .iter()
      .find_map(|k| record.get(*k).filter(|v| !v.is_null()))
      .cloned();

    Self {
      question: text_field(record, "question").unwrap_or_default(),
      options,
      correct_answer,
      explanation: non_empty_field(record, "explanation"),
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrueFalseItem {
  pub statement: String,
  /// Already normalized from `is_correct` / `correct_answer` / `answer`.
  pub correct: bool,
  pub explanation: Option<String>,
}

impl TrueFalseItem {
  pub fn from_value(record: &Value) -> Self {
    let statement = non_empty_field(record, "statement")
      .or_else(|| non_empty_field(record, "question"))
      .unwrap_or_else(|| "Unknown question".to_string());
    Self {
      statement,
      correct: true_false_correct(record),
      explanation: non_empty_field(record, "explanation"),
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlashcardItem {
  pub front: Option<String>,
  pub back: Option<String>,
}

impl FlashcardItem {
  pub fn from_value(record: &Value) -> Self {
    Self { front: text_field(record, "front"), back: text_field(record, "back") }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FillBlankItem {
  pub sentence_with_blank: Option<String>,
  /// Used in place of the sentence when it carries no blank token.
  pub question: Option<String>,
  pub hidden_word: Option<String>,
  pub explanation: Option<String>,
}

impl FillBlankItem {
  pub fn from_value(record: &Value) -> Self {
    Self {
      sentence_with_blank: text_field(record, "sentence_with_blank"),
      question: non_empty_field(record, "question"),
      hidden_word: non_empty_field(record, "hidden_word"),
      explanation: non_empty_field(record, "explanation"),
    }
  }

  /// Text before and after the input box.
  ///
  /// Only the first token is replaced; any further token stays literal.
  pub fn segments(&self) -> (String, String) {
    match self.sentence_with_blank.as_deref().and_then(|s| s.split_once(BLANK_TOKEN)) {
      Some((before, after)) => (before.to_string(), after.to_string()),
      None => (
        self.question.clone().unwrap_or_else(|| "Broken question".to_string()),
        String::new(),
      ),
    }
  }

  /// Trimmed, case-insensitive exact match. No hidden word means never correct.
  pub fn accepts(&self, attempt: &str) -> bool {
    match &self.hidden_word {
      Some(word) => attempt.trim().to_lowercase() == word.to_lowercase().trim(),
      None => false,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QaItem {
  pub question: String,
  pub suggested_answer: Option<String>,
  pub key_points: Option<Vec<String>>,
  pub explanation: Option<String>,
}

impl QaItem {
  pub fn from_value(record: &Value) -> Self {
    let key_points = match record.get("key_points") {
      Some(Value::Array(points)) => Some(points.iter().filter_map(text_of).collect()),
      _ => None,
    };
    Self {
      question: text_field(record, "question").unwrap_or_default(),
      suggested_answer: text_field(record, "suggested_answer"),
      key_points,
      explanation: non_empty_field(record, "explanation"),
    }
  }
}
