//! First-answer-wins answer storage.

use crate::error::GameError;

/// Outcome of [`AnswerSheet::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
  First,
  /// The item already had an answer; nothing changed.
  AlreadyAnswered,
}

/// One slot per item. A filled slot is never overwritten.
#[derive(Debug, Clone)]
pub struct AnswerSheet<T> {
  slots: Vec<Option<T>>,
}

impl<T: Copy> AnswerSheet<T> {
  pub fn new(len: usize) -> Self {
    Self { slots: vec![None; len] }
  }

  pub fn get(&self, index: usize) -> Option<T> {
    self.slots.get(index).copied().flatten()
  }

  pub fn record(&mut self, index: usize, value: T) -> Result<Recorded, GameError> {
    let len = self.slots.len();
    let slot = self.slots.get_mut(index).ok_or(GameError::ItemOutOfRange { index, len })?;
    match slot {
      Some(_) => Ok(Recorded::AlreadyAnswered),
      None => {
        *slot = Some(value);
        Ok(Recorded::First)
      }
    }
  }
}
