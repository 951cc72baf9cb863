//! Open Q&A: self-assessment with a reveal toggle, no correctness check.

use serde::Serialize;
use serde_json::Value;

use super::{Applied, Explanation};
use crate::domain::QaItem;
use crate::error::GameError;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct QaItemView {
  pub number: usize,
  pub question: String,
  pub revealed: bool,
  /// The fields below are only filled while revealed.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suggested_answer: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub key_points: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub explanation: Option<Explanation>,
}

pub struct QaGame {
  items: Vec<QaItem>,
  revealed: Vec<bool>,
}

impl QaGame {
  pub fn new(records: &[Value]) -> Self {
    let items: Vec<QaItem> = records.iter().map(QaItem::from_value).collect();
    let revealed = vec![false; items.len()];
    Self { items, revealed }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn set_revealed(&mut self, item: usize, revealed: bool) -> Result<Applied, GameError> {
    let len = self.revealed.len();
    let slot = self.revealed.get_mut(item).ok_or(GameError::ItemOutOfRange { index: item, len })?;
    *slot = revealed;
    Ok(Applied::nothing())
  }

  pub fn view(&self, premium: bool) -> Vec<QaItemView> {
    self
      .items
      .iter()
      .zip(&self.revealed)
      .enumerate()
      .map(|(i, (it, &revealed))| {
        let mut view = QaItemView {
          number: i + 1,
          question: it.question.clone(),
          revealed,
          suggested_answer: None,
          key_points: Vec::new(),
          explanation: None,
        };
        if revealed {
          view.suggested_answer = it.suggested_answer.clone();
          view.key_points = it.key_points.clone().unwrap_or_default();
          view.explanation = match (premium, it.explanation.as_deref()) {
            (true, None) => None,
            (_, text) => Some(Explanation::gate(text, premium)),
          };
        }
        view
      })
      .collect()
  }
}
