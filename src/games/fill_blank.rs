//! Fill-in-the-blank game.
//!
//! Unlike the choice games, a wrong check does not lock the item: the user can
//! keep editing until the answer is right, and only then does the input lock.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{AnswerRecord, Applied, Explanation, Submitted};
use crate::domain::FillBlankItem;
use crate::error::GameError;

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlankStatus {
  #[default]
  Pending,
  Wrong,
  Correct,
}

#[derive(Clone, Debug, Default)]
struct BlankState {
  draft: String,
  status: BlankStatus,
}

impl BlankState {
  fn locked(&self) -> bool {
    self.status == BlankStatus::Correct
  }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BlankItemView {
  pub number: usize,
  pub before: String,
  pub after: String,
  pub draft: String,
  pub status: BlankStatus,
  pub locked: bool,
  /// The check button is live only with a non-empty draft on an unlocked item.
  pub can_check: bool,
  /// Revealed after a wrong check.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expected: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub explanation: Option<Explanation>,
}

pub struct FillBlankGame {
  items: Vec<FillBlankItem>,
  states: Vec<BlankState>,
}

impl FillBlankGame {
  pub fn new(records: &[Value]) -> Self {
    let items: Vec<FillBlankItem> = records.iter().map(FillBlankItem::from_value).collect();
    let states = vec![BlankState::default(); items.len()];
    Self { items, states }
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  fn state_mut(&mut self, item: usize) -> Result<&mut BlankState, GameError> {
    let len = self.states.len();
    self.states.get_mut(item).ok_or(GameError::ItemOutOfRange { index: item, len })
  }

  pub fn input(&mut self, item: usize, text: String) -> Result<Applied, GameError> {
    let state = self.state_mut(item)?;
    if !state.locked() {
      state.draft = text;
    }
    Ok(Applied::nothing())
  }

  pub fn check(&mut self, item: usize, text: Option<String>) -> Result<Applied, GameError> {
    let len = self.items.len();
    let entry = self.items.get(item).ok_or(GameError::ItemOutOfRange { index: item, len })?;
    let state = self.states.get_mut(item).ok_or(GameError::ItemOutOfRange { index: item, len })?;
    if state.locked() {
      debug!(target: "games", item, "Blank already solved; ignoring check");
      return Ok(Applied::nothing());
    }
    if let Some(t) = text {
      state.draft = t;
    }
    if state.draft.is_empty() {
      return Ok(Applied::nothing());
    }

    let correct = entry.accepts(&state.draft);
    state.status = if correct { BlankStatus::Correct } else { BlankStatus::Wrong };
    Ok(Applied::answered(AnswerRecord {
      item,
      answer: Submitted::Text(state.draft.clone()),
      correct,
    }))
  }

  pub fn view(&self, premium: bool) -> Vec<BlankItemView> {
    self
      .items
      .iter()
      .zip(&self.states)
      .enumerate()
      .map(|(i, (it, st))| {
        let (before, after) = it.segments();
        let checked = st.status != BlankStatus::Pending;
        BlankItemView {
          number: i + 1,
          before,
          after,
          draft: st.draft.clone(),
          status: st.status,
          locked: st.locked(),
          can_check: !st.locked() && !st.draft.is_empty(),
          expected: match st.status {
            BlankStatus::Wrong => it.hidden_word.clone(),
            _ => None,
          },
          explanation: checked.then(|| Explanation::gate(it.explanation.as_deref(), premium)),
        }
      })
      .collect()
  }
}
